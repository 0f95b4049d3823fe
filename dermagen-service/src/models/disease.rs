use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Dermatological lesion category codes (HAM10000 taxonomy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiseaseClass {
    /// Actinic keratoses and intraepithelial carcinoma.
    Akiec,
    /// Basal cell carcinoma.
    Bcc,
    /// Benign keratosis-like lesions.
    Bkl,
    /// Dermatofibroma.
    Df,
    /// Melanoma.
    Mel,
    /// Melanocytic nevi.
    Nv,
    /// Vascular lesions.
    Vasc,
}

impl DiseaseClass {
    pub const ALL: [DiseaseClass; 7] = [
        DiseaseClass::Akiec,
        DiseaseClass::Bcc,
        DiseaseClass::Bkl,
        DiseaseClass::Df,
        DiseaseClass::Mel,
        DiseaseClass::Nv,
        DiseaseClass::Vasc,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            DiseaseClass::Akiec => "AKIEC",
            DiseaseClass::Bcc => "BCC",
            DiseaseClass::Bkl => "BKL",
            DiseaseClass::Df => "DF",
            DiseaseClass::Mel => "MEL",
            DiseaseClass::Nv => "NV",
            DiseaseClass::Vasc => "VASC",
        }
    }
}

impl fmt::Display for DiseaseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown disease class: {0}")]
pub struct UnknownDiseaseClass(pub String);

impl FromStr for DiseaseClass {
    type Err = UnknownDiseaseClass;

    /// Codes are matched exactly; `mel` is not `MEL`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiseaseClass::ALL
            .into_iter()
            .find(|class| class.code() == s)
            .ok_or_else(|| UnknownDiseaseClass(s.to_string()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassIndexMapError {
    #[error("malformed entry '{0}', expected CODE:INDEX")]
    MalformedEntry(String),
    #[error(transparent)]
    UnknownClass(#[from] UnknownDiseaseClass),
    #[error("invalid conditioning index '{0}'")]
    InvalidIndex(String),
}

/// Lookup from disease class to the conditioning index understood by the
/// generative model. The model only knows a few conditioning classes, so
/// several disease codes share an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassIndexMap {
    indices: HashMap<DiseaseClass, u8>,
}

impl Default for ClassIndexMap {
    fn default() -> Self {
        let indices = HashMap::from([
            (DiseaseClass::Akiec, 0),
            (DiseaseClass::Bcc, 1),
            (DiseaseClass::Bkl, 2),
            (DiseaseClass::Df, 0),
            (DiseaseClass::Mel, 1),
            (DiseaseClass::Nv, 2),
            (DiseaseClass::Vasc, 0),
        ]);
        Self { indices }
    }
}

impl ClassIndexMap {
    pub fn new(indices: HashMap<DiseaseClass, u8>) -> Self {
        Self { indices }
    }

    /// Conditioning index for `class`; 0 when the class has no entry.
    pub fn index_of(&self, class: DiseaseClass) -> u8 {
        self.indices.get(&class).copied().unwrap_or(0)
    }

    /// Apply `CODE:INDEX` overrides (comma separated) on top of the default table.
    ///
    /// ```
    /// use dermagen_service::models::{ClassIndexMap, DiseaseClass};
    ///
    /// let map = ClassIndexMap::parse_overrides("DF:1, VASC:2").unwrap();
    /// assert_eq!(map.index_of(DiseaseClass::Df), 1);
    /// assert_eq!(map.index_of(DiseaseClass::Bkl), 2);
    /// ```
    pub fn parse_overrides(spec: &str) -> Result<Self, ClassIndexMapError> {
        let mut map = Self::default();

        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (code, index) = entry
                .split_once(':')
                .ok_or_else(|| ClassIndexMapError::MalformedEntry(entry.to_string()))?;

            let class: DiseaseClass = code.trim().parse()?;
            let index: u8 = index
                .trim()
                .parse()
                .map_err(|_| ClassIndexMapError::InvalidIndex(index.trim().to_string()))?;

            map.indices.insert(class, index);
        }

        Ok(map)
    }
}
