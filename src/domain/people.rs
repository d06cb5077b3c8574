use std::fmt;

/// The fixed, ordered set of people sharing the vehicle.
///
/// Order matters: it drives the column order of the period table and the
/// order of the "owes" lines in a settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct People {
    names: Vec<String>,
}

impl People {
    /// Build the set, rejecting empty, blank or duplicated names.
    pub fn new<I, S>(names: I) -> Result<Self, PeopleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collected: Vec<String> = Vec::new();
        for name in names {
            let name: String = name.into();
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(PeopleError::BlankName);
            }
            if collected.contains(&name) {
                return Err(PeopleError::Duplicate(name));
            }
            collected.push(name);
        }

        if collected.is_empty() {
            return Err(PeopleError::Empty);
        }

        Ok(Self { names: collected })
    }

    pub fn contains(&self, person: &str) -> bool {
        self.names.iter().any(|name| name == person)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeopleError {
    Empty,
    BlankName,
    Duplicate(String),
}

impl fmt::Display for PeopleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeopleError::Empty => write!(f, "at least one person is required"),
            PeopleError::BlankName => write!(f, "person names cannot be blank"),
            PeopleError::Duplicate(name) => write!(f, "person listed twice: {}", name),
        }
    }
}

impl std::error::Error for PeopleError {}
