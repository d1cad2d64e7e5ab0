pub mod comment;
pub mod content;
pub mod newsletter;
pub mod taxonomy;
pub mod user;

pub use comment::Comment;
pub use content::{rating_in_range, Award, ContentKind, ContentRef, Movie, News, Review, ReviewSubject};
pub use newsletter::NewsletterSubscription;
pub use taxonomy::{Genre, Industry, StreamingPlatform};
pub use user::{Gender, User};
