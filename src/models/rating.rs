//! Four-button recall rating shown after a flashcard is revealed.
use crate::error::StudyError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rating {
    Again = 0,
    Hard = 1,
    Good = 2,
    Easy = 3,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    /// Position on the SM-2 0-5 quality scale.
    /// Values 1 and 3 are never produced.
    pub fn quality(self) -> u8 {
        match self {
            Rating::Again => 0,
            Rating::Hard => 2,
            Rating::Good => 4,
            Rating::Easy => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Again => "Again",
            Rating::Hard => "Hard",
            Rating::Good => "Good",
            Rating::Easy => "Easy",
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = StudyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rating::Again),
            1 => Ok(Rating::Hard),
            2 => Ok(Rating::Good),
            3 => Ok(Rating::Easy),
            other => Err(StudyError::InvalidRating(other)),
        }
    }
}
