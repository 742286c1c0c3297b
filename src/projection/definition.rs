//! proj.4-style coordinate system definitions
//!
//! A definition is a whitespace separated list of `+key=value` or `+flag`
//! tokens. `+init=<file>:<code>` pulls the tokens of entry `<code>` from an
//! init file found on the [`SearchPath`]; tokens written explicitly in the
//! definition win over the ones pulled in.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::ProjectionError;

/// WGS84 semi-major axis in meters
pub const WGS84_SEMI_MAJOR: f64 = 6_378_137.0;
/// WGS84 inverse flattening
pub const WGS84_INV_FLATTENING: f64 = 298.257_223_563;

/// Init entries available even when no data directory provides them
const BUILTIN_INIT: &[(&str, &str, &str)] = &[(
    "epsg",
    "4326",
    "+proj=longlat +datum=WGS84 +no_defs",
)];

/// Reference ellipsoid. An inverse flattening of zero denotes a sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub semi_major: f64,
    pub inv_flattening: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major: WGS84_SEMI_MAJOR,
        inv_flattening: WGS84_INV_FLATTENING,
    };

    pub const GRS80: Ellipsoid = Ellipsoid {
        semi_major: 6_378_137.0,
        inv_flattening: 298.257_222_101,
    };

    pub fn sphere(radius: f64) -> Self {
        Self {
            semi_major: radius,
            inv_flattening: 0.0,
        }
    }

    fn named(name: &str) -> Option<Self> {
        match name {
            "WGS84" => Some(Self::WGS84),
            "GRS80" => Some(Self::GRS80),
            "sphere" => Some(Self::sphere(6_370_997.0)),
            _ => None,
        }
    }

    /// Whether two ellipsoids describe the same figure
    pub fn same_as(&self, other: &Ellipsoid) -> bool {
        (self.semi_major - other.semi_major).abs() < 1e-6
            && (self.inv_flattening - other.inv_flattening).abs() < 1e-9
    }
}

/// Directories searched, in order, for init files such as `epsg`
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// First directory entry named `file`, if any
    pub fn find(&self, file: &str) -> Option<PathBuf> {
        self.dirs
            .iter()
            .map(|dir| dir.join(file))
            .find(|candidate| candidate.is_file())
    }

    /// Definition tokens of entry `<code>` in init file `file`
    fn lookup_init(&self, file: &str, code: &str) -> Result<String, ProjectionError> {
        if let Some(path) = self.find(file) {
            log::debug!("Resolving <{}> from {}", code, path.display());
            return read_init_entry(&path, code)?.ok_or_else(|| ProjectionError::InitNotFound {
                file: path.display().to_string(),
                code: code.to_string(),
            });
        }

        match BUILTIN_INIT
            .iter()
            .find(|(f, c, _)| f.eq_ignore_ascii_case(file) && *c == code)
        {
            Some((_, _, definition)) => {
                log::debug!(
                    "No `{}` init file on the search path, using built-in <{}>",
                    file,
                    code
                );
                Ok(definition.to_string())
            }
            None => Err(ProjectionError::InitNotFound {
                file: file.to_string(),
                code: code.to_string(),
            }),
        }
    }
}

fn read_init_entry(path: &Path, code: &str) -> Result<Option<String>, ProjectionError> {
    let text = fs::read_to_string(path).map_err(|source| ProjectionError::InitRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(find_init_entry(&text, code))
}

/// Scan proj.4 init-file text for `<code> tokens... <>`
fn find_init_entry(text: &str, code: &str) -> Option<String> {
    let mut current: Option<&str> = None;
    let mut tokens: Vec<&str> = Vec::new();

    let words = text
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default())
        .flat_map(str::split_whitespace);

    for word in words {
        if word == "<>" {
            if current == Some(code) {
                return Some(tokens.join(" "));
            }
            current = None;
            tokens.clear();
        } else if let Some(name) = word.strip_prefix('<').and_then(|w| w.strip_suffix('>')) {
            current = Some(name);
            tokens.clear();
        } else if current.is_some() {
            tokens.push(word);
        }
    }

    // A final entry may omit its terminator
    (current == Some(code)).then(|| tokens.join(" "))
}

/// Parsed `+key[=value]` parameters
#[derive(Debug, Clone, Default)]
struct Params(BTreeMap<String, Option<String>>);

impl Params {
    fn parse(definition: &str) -> Result<Self, ProjectionError> {
        let mut params = BTreeMap::new();
        for token in definition.split_whitespace() {
            let body = token
                .strip_prefix('+')
                .ok_or_else(|| ProjectionError::MalformedToken(token.to_string()))?;
            let (key, value) = match body.split_once('=') {
                Some((key, value)) => (key, Some(value.to_string())),
                None => (body, None),
            };
            if key.is_empty() {
                return Err(ProjectionError::MalformedToken(token.to_string()));
            }
            params.insert(key.to_string(), value);
        }
        Ok(Self(params))
    }

    /// Replace `+init` with the referenced entry, keeping explicit tokens
    fn expand_init(mut self, search_path: &SearchPath) -> Result<Self, ProjectionError> {
        let Some(init) = self.0.remove("init") else {
            return Ok(self);
        };
        let init = init.ok_or_else(|| ProjectionError::MalformedToken("+init".to_string()))?;
        let (file, code) = init
            .split_once(':')
            .ok_or_else(|| ProjectionError::InvalidParameter {
                key: "init".to_string(),
                value: init.clone(),
            })?;

        let mut expanded = Params::parse(&search_path.lookup_init(file, code)?)?;
        if expanded.0.contains_key("init") {
            return Err(ProjectionError::Unsupported(format!(
                "nested +init in <{}>",
                code
            )));
        }
        expanded.0.extend(self.0);
        Ok(expanded)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_deref())
    }

    fn number(&self, key: &str) -> Result<Option<f64>, ProjectionError> {
        self.text(key)
            .map(|value| {
                value
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| ProjectionError::InvalidParameter {
                        key: key.to_string(),
                        value: value.to_string(),
                    })
            })
            .transpose()
    }

    fn ellipsoid(&self) -> Result<Ellipsoid, ProjectionError> {
        if let Some(datum) = self.text("datum")
            && datum != "WGS84"
        {
            return Err(ProjectionError::Unsupported(format!("datum `{}`", datum)));
        }

        let mut ellipsoid = match self.text("ellps") {
            Some(name) => Ellipsoid::named(name)
                .ok_or_else(|| ProjectionError::InvalidEllipsoid(format!("unknown `{}`", name)))?,
            None => Ellipsoid::WGS84,
        };

        if let Some(radius) = self.number("R")? {
            ellipsoid = Ellipsoid::sphere(radius);
        }
        if let Some(a) = self.number("a")? {
            ellipsoid.semi_major = a;
        }
        if let Some(rf) = self.number("rf")? {
            ellipsoid.inv_flattening = rf;
        } else if let Some(f) = self.number("f")? {
            ellipsoid.inv_flattening = if f == 0.0 { 0.0 } else { 1.0 / f };
        } else if let Some(b) = self.number("b")? {
            let a = ellipsoid.semi_major;
            ellipsoid.inv_flattening = if a == b { 0.0 } else { a / (a - b) };
        } else if let Some(es) = self.number("es")? {
            ellipsoid.inv_flattening = if es == 0.0 {
                0.0
            } else {
                1.0 / (1.0 - (1.0 - es).sqrt())
            };
        }

        if ellipsoid.semi_major <= 0.0 {
            return Err(ProjectionError::InvalidEllipsoid(format!(
                "semi-major axis {}",
                ellipsoid.semi_major
            )));
        }
        if ellipsoid.inv_flattening != 0.0 && ellipsoid.inv_flattening <= 1.0 {
            return Err(ProjectionError::InvalidEllipsoid(format!(
                "inverse flattening {}",
                ellipsoid.inv_flattening
            )));
        }
        Ok(ellipsoid)
    }

    fn check_datum_shift(&self) -> Result<(), ProjectionError> {
        let Some(shift) = self.text("towgs84") else {
            return Ok(());
        };
        for value in shift.split(',') {
            let parsed: f64 =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ProjectionError::InvalidParameter {
                        key: "towgs84".to_string(),
                        value: shift.to_string(),
                    })?;
            if parsed != 0.0 {
                return Err(ProjectionError::Unsupported(format!(
                    "datum shift +towgs84={}",
                    shift
                )));
            }
        }
        Ok(())
    }
}

/// A coordinate reference system the projector can transform between
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateSystem {
    /// Geographic longitude/latitude in radians
    LongLat { ellipsoid: Ellipsoid },
    /// Orthographic plane in meters; origin in radians
    Orthographic {
        ellipsoid: Ellipsoid,
        lat_0: f64,
        lon_0: f64,
    },
}

impl CoordinateSystem {
    /// Parse a proj.4 definition, resolving `+init` through `search_path`
    pub fn from_proj_string(
        definition: &str,
        search_path: &SearchPath,
    ) -> Result<Self, ProjectionError> {
        let params = Params::parse(definition)?.expand_init(search_path)?;
        params.check_datum_shift()?;

        if let Some(units) = params.text("units")
            && units != "m"
        {
            return Err(ProjectionError::Unsupported(format!("units `{}`", units)));
        }

        for key in params.0.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                log::debug!("Ignoring projection parameter +{}", key);
            }
        }

        let ellipsoid = params.ellipsoid()?;
        let proj = params.text("proj").ok_or(ProjectionError::MissingProjection)?;
        match proj {
            "longlat" | "latlong" | "lonlat" | "latlon" => Ok(Self::LongLat { ellipsoid }),
            "ortho" => {
                let lat_0 = params.number("lat_0")?.unwrap_or(0.0);
                if lat_0.abs() > 90.0 {
                    return Err(ProjectionError::InvalidParameter {
                        key: "lat_0".to_string(),
                        value: lat_0.to_string(),
                    });
                }
                let lon_0 = params.number("lon_0")?.unwrap_or(0.0);
                Ok(Self::Orthographic {
                    ellipsoid,
                    lat_0: lat_0.to_radians(),
                    lon_0: lon_0.to_radians(),
                })
            }
            other => Err(ProjectionError::UnknownProjection(other.to_string())),
        }
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        match self {
            Self::LongLat { ellipsoid } | Self::Orthographic { ellipsoid, .. } => ellipsoid,
        }
    }
}

const KNOWN_KEYS: &[&str] = &[
    "proj", "a", "b", "rf", "f", "es", "R", "ellps", "datum", "towgs84", "lat_0", "lon_0",
    "units", "no_defs", "type", "wktext",
];
