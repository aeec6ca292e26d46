use crate::Campaign;

use thiserror::Error;

pub trait Validator {
    fn validate(&self) -> Result<(), Error>;
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Validation {
    BlankName,
    /// names are capped at 255 characters
    NameTooLong,
    BlankUrl,
    /// `end_date` must not precede `start_date`
    InvalidDateWindow,
}

#[derive(Debug, Eq, PartialEq, Clone, Copy, Error)]
pub enum Error {
    #[error("Validation error: {0:?}")]
    Validation(Validation),
}

impl From<Validation> for Error {
    fn from(v: Validation) -> Self {
        Self::Validation(v)
    }
}

impl Validator for Campaign {
    fn validate(&self) -> Result<(), Error> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Validation::BlankName.into());
        }
        if name.chars().count() > 255 {
            return Err(Validation::NameTooLong.into());
        }

        if self.url.trim().is_empty() {
            return Err(Validation::BlankUrl.into());
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(Validation::InvalidDateWindow.into());
            }
        }

        Ok(())
    }
}
