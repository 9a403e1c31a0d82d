//! Experiment vocabulary: datasets, model variants and the hyperparameter
//! dimensions each variant sweeps over.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Expression dataset a sweep trains on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "UPPERCASE")]
pub enum Dataset {
    #[default]
    #[cfg_attr(feature = "clap", value(name = "TCGA"))]
    Tcga,
    #[cfg_attr(feature = "clap", value(name = "TARGET"))]
    Target,
    #[cfg_attr(feature = "clap", value(name = "GTEX"))]
    Gtex,
}

impl Dataset {
    pub const ALL: [Dataset; 3] = [Dataset::Tcga, Dataset::Target, Dataset::Gtex];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcga => "TCGA",
            Self::Target => "TARGET",
            Self::Gtex => "GTEX",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown dataset: {s}"))
    }
}

/// A swept hyperparameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Dimensionality of the compressed latent space.
    NumComponents,
    LearningRate,
    BatchSize,
    Epochs,
    /// VAE warmup factor.
    Kappa,
    /// ADAGE weight sparsity penalty.
    Sparsity,
    /// ADAGE input dropout proportion.
    Noise,
}

impl Dimension {
    /// Every dimension any algorithm recognises, in parameter-file order.
    pub const ALL: [Dimension; 7] = [
        Dimension::NumComponents,
        Dimension::LearningRate,
        Dimension::BatchSize,
        Dimension::Epochs,
        Dimension::Kappa,
        Dimension::Sparsity,
        Dimension::Noise,
    ];

    /// Row name in the parameter file.
    pub fn param_name(&self) -> &'static str {
        match self {
            Self::NumComponents => "num_components",
            Self::LearningRate => "learning_rate",
            Self::BatchSize => "batch_size",
            Self::Epochs => "epochs",
            Self::Kappa => "kappa",
            Self::Sparsity => "sparsity",
            Self::Noise => "noise",
        }
    }

    /// Command-line flag understood by the training scripts.
    pub fn flag(&self) -> String {
        format!("--{}", self.param_name())
    }

    /// Suffix appended to the value when encoding it in an output filename.
    pub fn filename_suffix(&self) -> &'static str {
        match self {
            Self::NumComponents => "z",
            Self::LearningRate => "lr",
            Self::BatchSize => "bs",
            Self::Epochs => "e",
            Self::Kappa => "k",
            Self::Sparsity => "s",
            Self::Noise => "n",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param_name())
    }
}

/// Single-valued parameter selecting tied or untied ADAGE weights.
pub const WEIGHTS_PARAM: &str = "weights";

/// Model family to sweep. Each variant fixes the dimension set, the filename
/// template and any trailing flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Variational autoencoder.
    #[default]
    Tybalt,
    /// Denoising autoencoder.
    Adage,
}

const TYBALT_DIMENSIONS: [Dimension; 5] = [
    Dimension::NumComponents,
    Dimension::LearningRate,
    Dimension::BatchSize,
    Dimension::Epochs,
    Dimension::Kappa,
];

const ADAGE_DIMENSIONS: [Dimension; 6] = [
    Dimension::NumComponents,
    Dimension::LearningRate,
    Dimension::BatchSize,
    Dimension::Epochs,
    Dimension::Sparsity,
    Dimension::Noise,
];

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tybalt => "tybalt",
            Self::Adage => "adage",
        }
    }

    /// Swept dimensions, outermost first.
    pub fn dimensions(&self) -> &'static [Dimension] {
        match self {
            Self::Tybalt => &TYBALT_DIMENSIONS,
            Self::Adage => &ADAGE_DIMENSIONS,
        }
    }

    /// Training script forced for this variant regardless of `--script`.
    pub fn script_override(&self) -> Option<&'static str> {
        match self {
            Self::Tybalt => None,
            Self::Adage => Some("scripts/adage_pancancer.py"),
        }
    }

    /// Whether this variant reads the single-valued `weights` parameter.
    pub fn uses_weights(&self) -> bool {
        matches!(self, Self::Adage)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tybalt" => Ok(Self::Tybalt),
            "adage" => Ok(Self::Adage),
            other => Err(format!("unknown algorithm: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_round_trips_through_str() {
        for dataset in Dataset::ALL {
            assert_eq!(dataset.as_str().parse::<Dataset>().unwrap(), dataset);
        }
        assert!("tcga".parse::<Dataset>().is_err());
        assert_eq!(Dataset::default(), Dataset::Tcga);
    }

    #[test]
    fn tybalt_sweeps_five_dimensions() {
        let dims = Algorithm::Tybalt.dimensions();
        assert_eq!(dims.len(), 5);
        assert_eq!(dims.last(), Some(&Dimension::Kappa));
        assert!(Algorithm::Tybalt.script_override().is_none());
        assert!(!Algorithm::Tybalt.uses_weights());
    }

    #[test]
    fn adage_sweeps_six_dimensions() {
        let dims = Algorithm::Adage.dimensions();
        assert_eq!(dims.len(), 6);
        assert_eq!(&dims[4..], &[Dimension::Sparsity, Dimension::Noise]);
        assert_eq!(
            Algorithm::Adage.script_override(),
            Some("scripts/adage_pancancer.py")
        );
    }

    #[test]
    fn all_dimensions_cover_every_algorithm() {
        for algorithm in [Algorithm::Tybalt, Algorithm::Adage] {
            assert!(algorithm
                .dimensions()
                .iter()
                .all(|dim| Dimension::ALL.contains(dim)));
        }
        assert!(!Dimension::ALL
            .iter()
            .any(|dim| dim.param_name() == WEIGHTS_PARAM));
    }

    #[test]
    fn dimension_flags_and_suffixes() {
        assert_eq!(Dimension::LearningRate.flag(), "--learning_rate");
        assert_eq!(Dimension::NumComponents.filename_suffix(), "z");
        assert_eq!(Dimension::Noise.to_string(), "noise");
    }

    #[test]
    fn serde_names_match_cli_names() {
        let json = serde_json::to_string(&Dataset::Gtex).unwrap();
        assert_eq!(json, "\"GTEX\"");
        let json = serde_json::to_string(&Algorithm::Adage).unwrap();
        assert_eq!(json, "\"adage\"");
    }
}
