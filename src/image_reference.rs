use std::fmt;

/// `<repository>/<image>` as used in the registry v1 API paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub repository: String,
    pub image: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    MissingRepository,
    MissingImage,
}

impl std::error::Error for ParseError {}
impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingRepository => write!(f, "repository is missing"),
            ParseError::MissingImage => write!(f, "image is missing"),
        }
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.repository, self.image)
    }
}

impl ImageReference {
    pub fn new(repository: &str, image: &str) -> Result<Self, ParseError> {
        if repository.is_empty() {
            return Err(ParseError::MissingRepository);
        }
        if image.is_empty() {
            return Err(ParseError::MissingImage);
        }

        Ok(Self {
            repository: repository.to_string(),
            image: image.to_string(),
        })
    }

    /// Path segments on the index host that hands out registry endpoints and tokens.
    pub fn images_path(&self) -> Vec<&str> {
        self.v1_path(&["images"])
    }

    pub fn latest_tag_path(&self) -> Vec<&str> {
        self.v1_path(&["tags", "latest"])
    }

    /// Unescaped segments; a `/` inside the repository or image separates segments.
    fn v1_path<'a>(&'a self, suffix: &[&'a str]) -> Vec<&'a str> {
        let prefix: [&'a str; 2] = ["v1", "repositories"];
        prefix
            .into_iter()
            .chain(self.repository.split('/'))
            .chain(self.image.split('/'))
            .chain(suffix.iter().copied())
            .collect()
    }
}
