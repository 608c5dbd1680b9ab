//! CMR deployment environments.

use std::fmt;
use std::str::FromStr;

use crate::error::CmrError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CmrEnvironment {
    #[default]
    Ops,
    Uat,
    Sit,
}

impl CmrEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            CmrEnvironment::Ops => "ops",
            CmrEnvironment::Uat => "uat",
            CmrEnvironment::Sit => "sit",
        }
    }

    /// CMR host name for this environment.
    pub fn host(&self) -> &'static str {
        match self {
            CmrEnvironment::Ops => "cmr.earthdata.nasa.gov",
            CmrEnvironment::Uat => "cmr.uat.earthdata.nasa.gov",
            CmrEnvironment::Sit => "cmr.sit.earthdata.nasa.gov",
        }
    }

    pub fn base_url(&self) -> String {
        format!("https://{}", self.host())
    }
}

impl fmt::Display for CmrEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CmrEnvironment {
    type Err = CmrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ops" | "prod" => Ok(CmrEnvironment::Ops),
            "uat" => Ok(CmrEnvironment::Uat),
            "sit" => Ok(CmrEnvironment::Sit),
            other => Err(CmrError::UnknownEnvironment(other.to_string())),
        }
    }
}
