//! Implementations of different branch predictors.

pub mod counter;
pub mod gshare;
pub mod simple;
pub mod table;
pub mod tournament;
pub mod yags;

pub use counter::*;
pub use gshare::*;
pub use simple::*;
pub use table::*;
pub use tournament::*;
pub use yags::*;

use std::str::FromStr;

use thiserror::Error;

use crate::branch::Outcome;

/// Widest supported table index. Matches the 32-bit addresses carried by
/// the traces; wider tables could not be filled by distinct addresses.
pub const MAX_INDEX_BITS: usize = 32;

/// Interface to a direction predictor driven by the branch address.
pub trait BranchPredictor {
    fn name(&self) -> &'static str;

    /// Return the predicted direction for the branch at this address.
    fn predict(&self, pc: usize) -> Outcome;

    /// Update the internal state of the predictor with the correct outcome.
    fn train(&mut self, pc: usize, outcome: Outcome);

    /// Number of storage bits modeled by the predictor's tables.
    fn storage_bits(&self) -> usize {
        0
    }
}

/// Errors reported while constructing a predictor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be at least one bit wide")]
    ZeroWidth(&'static str),

    #[error("{name} of {bits} bits exceeds the {MAX_INDEX_BITS}-bit limit")]
    WidthTooLarge { name: &'static str, bits: usize },

    #[error(
        "exception index of {exception_bits} bits must be narrower than \
         the {history_bits}-bit history index"
    )]
    ExceptionTooWide {
        exception_bits: usize,
        history_bits: usize,
    },

    #[error(
        "tag fragment of {tag_bits} bits must be wider than the \
         {exception_bits}-bit exception index"
    )]
    TagTooNarrow {
        tag_bits: usize,
        exception_bits: usize,
    },

    #[error("unrecognized predictor '{0}'")]
    UnknownPredictor(String),
}

pub(crate) fn check_width(
    name: &'static str,
    bits: usize,
) -> Result<(), ConfigError> {
    if bits == 0 {
        return Err(ConfigError::ZeroWidth(name));
    }
    if bits > MAX_INDEX_BITS {
        return Err(ConfigError::WidthTooLarge { name, bits });
    }
    Ok(())
}

/// The available predictor variants. Selected once at start-up; the variant
/// is fixed for the whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PredictorKind {
    /// Always predict taken
    Static,
    /// Always predict not-taken
    NotTaken,
    /// Predict at random
    Random,
    /// Single counter table indexed by pc XOR global history
    Gshare,
    /// Chooser between global and per-address local predictors
    Tournament,
    /// Gshare base with tagged exception tables
    Yags,
}

impl FromStr for PredictorKind {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" | "taken" => Ok(Self::Static),
            "not-taken" | "nottaken" => Ok(Self::NotTaken),
            "random" => Ok(Self::Random),
            "gshare" => Ok(Self::Gshare),
            "tournament" => Ok(Self::Tournament),
            "yags" | "custom" => Ok(Self::Yags),
            _ => Err(ConfigError::UnknownPredictor(s.to_string())),
        }
    }
}

/// Table-sizing bit widths shared by the stateful predictor variants.
///
/// Each width governs one power-of-two table size. Variants read only the
/// widths they use.
#[derive(Clone, Copy, Debug)]
pub struct PredictorConfig {
    /// Index width of the gshare/global/base counter tables
    pub history_bits: usize,

    /// Width of each tracked per-address history value
    pub local_history_bits: usize,

    /// Index width of the local history table
    pub local_index_bits: usize,

    /// Index width of the tournament chooser table
    pub chooser_bits: usize,

    /// Index width of the YAGS exception tables
    pub exception_bits: usize,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            history_bits: 17,
            local_history_bits: 10,
            local_index_bits: 10,
            chooser_bits: 12,
            exception_bits: 10,
        }
    }
}

/// Build the selected predictor variant.
///
/// Fails before any table allocation when the configuration names an
/// invalid width.
pub fn build_predictor(
    kind: PredictorKind,
    cfg: &PredictorConfig,
) -> Result<Box<dyn BranchPredictor>, ConfigError> {
    let predictor: Box<dyn BranchPredictor> = match kind {
        PredictorKind::Static => Box::new(TakenPredictor),
        PredictorKind::NotTaken => Box::new(NotTakenPredictor),
        PredictorKind::Random => Box::new(RandomPredictor),
        PredictorKind::Gshare => Box::new(
            GshareConfig {
                history_bits: cfg.history_bits,
            }
            .build()?,
        ),
        PredictorKind::Tournament => Box::new(
            TournamentConfig {
                history_bits: cfg.history_bits,
                local_history_bits: cfg.local_history_bits,
                local_index_bits: cfg.local_index_bits,
                chooser_bits: cfg.chooser_bits,
            }
            .build()?,
        ),
        PredictorKind::Yags => Box::new(
            YagsConfig {
                history_bits: cfg.history_bits,
                exception_bits: cfg.exception_bits,
                ..YagsConfig::default()
            }
            .build()?,
        ),
    };
    Ok(predictor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_parse() {
        assert_eq!("static".parse(), Ok(PredictorKind::Static));
        assert_eq!("gshare".parse(), Ok(PredictorKind::Gshare));
        assert_eq!("tournament".parse(), Ok(PredictorKind::Tournament));
        assert_eq!("yags".parse(), Ok(PredictorKind::Yags));
        assert_eq!("custom".parse(), Ok(PredictorKind::Yags));
        assert!(matches!(
            "perceptron".parse::<PredictorKind>(),
            Err(ConfigError::UnknownPredictor(_))
        ));
    }

    #[test]
    fn every_kind_builds_with_defaults() {
        let cfg = PredictorConfig::default();
        for kind in [
            PredictorKind::Static,
            PredictorKind::NotTaken,
            PredictorKind::Random,
            PredictorKind::Gshare,
            PredictorKind::Tournament,
            PredictorKind::Yags,
        ] {
            assert!(build_predictor(kind, &cfg).is_ok());
        }
    }

    #[test]
    fn zero_width_fails_construction() {
        let cfg = PredictorConfig {
            history_bits: 0,
            ..PredictorConfig::default()
        };
        assert_eq!(
            build_predictor(PredictorKind::Gshare, &cfg).err(),
            Some(ConfigError::ZeroWidth("history_bits"))
        );
    }

    #[test]
    fn oversized_width_fails_construction() {
        let cfg = PredictorConfig {
            chooser_bits: MAX_INDEX_BITS + 1,
            ..PredictorConfig::default()
        };
        assert!(matches!(
            build_predictor(PredictorKind::Tournament, &cfg),
            Err(ConfigError::WidthTooLarge { name: "chooser_bits", .. })
        ));
    }

    #[test]
    fn yags_exception_index_must_be_narrower_than_history() {
        let cfg = PredictorConfig {
            history_bits: 10,
            exception_bits: 10,
            ..PredictorConfig::default()
        };
        assert_eq!(
            build_predictor(PredictorKind::Yags, &cfg).err(),
            Some(ConfigError::ExceptionTooWide {
                exception_bits: 10,
                history_bits: 10,
            })
        );
    }
}
