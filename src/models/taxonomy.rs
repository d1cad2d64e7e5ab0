/// Genre, industry and streaming-platform lookup tables referenced by
/// movies and reviews. All three are plain id + name records.

#[derive(Debug, Clone)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Industry {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct StreamingPlatform {
    pub id: u64,
    pub name: String,
}
