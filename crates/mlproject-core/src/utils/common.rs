//! File utilities used by every pipeline stage.
//!
//! Each operation validates its arguments, performs one read or write, and
//! records one `info` line in the [`LogSink`] it was constructed with.  File
//! handles are scoped to the call and released on every exit path.
//!
//! | Operation            | Log line                                      |
//! |----------------------|-----------------------------------------------|
//! | `read_yaml`          | `yaml file: <path> loaded successfully`       |
//! | `create_directories` | `Created directory at: <path>` (per path)     |
//! | `save_json`          | `Json file saved at: <path>`                  |
//! | `load_json`          | `Json file loaded from: <path>`               |
//! | `save_bin`           | `Object saved at: <path>`                     |
//! | `load_bin`           | `Object loaded from: <path>`                  |
//! | `get_size`           | `File size of <path> is <n> KB`               |
//!
//! Only `read_yaml` logs failures (at `error`), and it deliberately skips
//! [`UtilsError::ValueConversion`], which is returned untouched.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ciborium::value::Value as Tree;
use serde::de::DeserializeOwned;
use serde::ser::Error as _;
use serde::Serialize;
use tracing::{error, info};

use crate::domain::ConfigBox;
use crate::error::{Result, UtilsError};
use crate::logging::LogSink;
use crate::utils::binary::{decode_artifact, encode_artifact, ArtifactError};
use crate::utils::validate::{ensure_mapping, ensure_path, ensure_paths};

/// The file utility set, bound to an explicit log sink.
///
/// # Examples
///
/// ```rust,no_run
/// use mlproject_core::{logging, FileUtils, LogConfig};
///
/// let sink = logging::init(&LogConfig::default())?;
/// let files = FileUtils::new(sink);
/// let config = files.read_yaml("config/config.yaml")?;
/// files.create_directories(&[config.get_str("artifacts_root")?], true)?;
/// # Ok::<(), mlproject_core::UtilsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileUtils {
    sink: LogSink,
}

impl FileUtils {
    pub fn new(sink: LogSink) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &LogSink {
        &self.sink
    }

    /// Reads a YAML document into a [`ConfigBox`].
    ///
    /// An empty file yields an empty mapping.
    ///
    /// # Errors
    ///
    /// - [`UtilsError::ValueConversion`] if the document is not a mapping;
    ///   returned as-is without an error log.
    /// - [`UtilsError::Io`] / [`UtilsError::Yaml`] for unreadable files or bad
    ///   syntax; logged at `error` first, then returned.
    pub fn read_yaml(&self, path_to_yaml: impl AsRef<Path>) -> Result<ConfigBox> {
        let path = path_to_yaml.as_ref();
        ensure_path(path, "path_to_yaml")?;

        self.sink.in_scope(|| {
            let parsed = std::fs::read_to_string(path)
                .map_err(|e| UtilsError::io(path, e))
                .and_then(|text| ConfigBox::parse_yaml(&text, path));

            match parsed {
                Ok(config) => {
                    info!("yaml file: {} loaded successfully", path.display());
                    Ok(config)
                }
                Err(e @ UtilsError::ValueConversion(_)) => Err(e),
                Err(e) => {
                    error!("Error occurred while reading yaml file: {e}");
                    Err(e)
                }
            }
        })
    }

    /// Creates each directory (and missing parents) in order.
    ///
    /// Directories that already exist are not an error.  With `verbose`, one
    /// line is logged per path.
    ///
    /// # Errors
    ///
    /// [`UtilsError::TypeMismatch`] for an invalid path (checked for every
    /// element before the first directory is created), otherwise the first
    /// [`UtilsError::Io`] encountered.
    pub fn create_directories<P: AsRef<Path>>(
        &self,
        path_to_directories: &[P],
        verbose: bool,
    ) -> Result<()> {
        ensure_paths(path_to_directories, "path_to_directories")?;

        self.sink.in_scope(|| {
            for path in path_to_directories {
                let path = path.as_ref();
                std::fs::create_dir_all(path).map_err(|e| UtilsError::io(path, e))?;
                if verbose {
                    info!("Created directory at: {}", path.display());
                }
            }
            Ok(())
        })
    }

    /// Writes `data` as JSON with 4-space indentation, replacing any existing file.
    ///
    /// # Errors
    ///
    /// - [`UtilsError::TypeMismatch`] if `data` does not serialize to a mapping.
    /// - [`UtilsError::Json`] if `data` cannot be represented as JSON,
    ///   including NaN or infinite floats.  Nothing is written in that case.
    /// - [`UtilsError::Io`] for file-system failures.
    pub fn save_json<T: Serialize + ?Sized>(&self, path: impl AsRef<Path>, data: &T) -> Result<()> {
        let path = path.as_ref();
        ensure_path(path, "path")?;
        let json_error = |source| UtilsError::Json {
            path: path.to_path_buf(),
            source,
        };
        let value = serde_json::to_value(data).map_err(json_error)?;
        ensure_mapping(&value, "data")?;
        // serde_json stores NaN and infinities as `null`.
        if let Some(found) = non_finite_float(data) {
            return Err(json_error(serde_json::Error::custom(format!(
                "non-finite float {found} has no JSON representation"
            ))));
        }

        let file = File::create(path).map_err(|e| UtilsError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
        value.serialize(&mut serializer).map_err(json_error)?;
        writer.flush().map_err(|e| UtilsError::io(path, e))?;

        self.sink
            .in_scope(|| info!("Json file saved at: {}", path.display()));
        Ok(())
    }

    /// Reads a JSON document into a [`ConfigBox`].
    ///
    /// # Errors
    ///
    /// [`UtilsError::Io`], [`UtilsError::Json`], or
    /// [`UtilsError::ValueConversion`] when the top level is not an object.
    pub fn load_json(&self, path: impl AsRef<Path>) -> Result<ConfigBox> {
        let path = path.as_ref();
        ensure_path(path, "path")?;

        let text = std::fs::read_to_string(path).map_err(|e| UtilsError::io(path, e))?;
        let content = ConfigBox::parse_json(&text, path)?;

        self.sink
            .in_scope(|| info!("Json file loaded from: {}", path.display()));
        Ok(content)
    }

    /// Stores any serializable value as a binary artifact.
    ///
    /// # Errors
    ///
    /// [`UtilsError::Binary`] if `data` cannot be serialized, or
    /// [`UtilsError::Io`] for file-system failures.
    pub fn save_bin<T: Serialize + ?Sized>(&self, data: &T, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        ensure_path(path, "path")?;

        let bytes = encode_artifact(data).map_err(|source| UtilsError::Binary {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, bytes).map_err(|e| UtilsError::io(path, e))?;

        self.sink
            .in_scope(|| info!("Object saved at: {}", path.display()));
        Ok(())
    }

    /// Loads a value previously written by [`FileUtils::save_bin`].
    ///
    /// # Errors
    ///
    /// [`UtilsError::Io`], [`UtilsError::BinaryFormat`] for files without a
    /// compatible header, or [`UtilsError::Binary`] when the payload does not
    /// decode as `T`.
    pub fn load_bin<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> Result<T> {
        let path = path.as_ref();
        ensure_path(path, "path")?;

        let bytes = std::fs::read(path).map_err(|e| UtilsError::io(path, e))?;
        let data = decode_artifact(&bytes).map_err(|err| match err {
            ArtifactError::Header(reason) => UtilsError::BinaryFormat {
                path: path.to_path_buf(),
                reason,
            },
            source => UtilsError::Binary {
                path: path.to_path_buf(),
                source,
            },
        })?;

        self.sink
            .in_scope(|| info!("Object loaded from: {}", path.display()));
        Ok(data)
    }

    /// Returns the file size in kibibytes, e.g. `"2.0 KB"`.
    ///
    /// # Errors
    ///
    /// [`UtilsError::Io`] if the path does not exist.
    pub fn get_size(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        ensure_path(path, "path")?;

        let bytes = std::fs::metadata(path)
            .map_err(|e| UtilsError::io(path, e))?
            .len();
        let size_in_kb = format_kb(bytes);

        self.sink
            .in_scope(|| info!("File size of {} is {size_in_kb} KB", path.display()));
        Ok(format!("{size_in_kb} KB"))
    }
}

/// Returns `"<value> at `<dotted.path>`"` for the first NaN or infinity in `data`.
fn non_finite_float<T: Serialize + ?Sized>(data: &T) -> Option<String> {
    let tree = Tree::serialized(data).ok()?;
    find_non_finite(&tree, "")
}

fn find_non_finite(node: &Tree, at: &str) -> Option<String> {
    let child = |segment: &str| {
        if at.is_empty() {
            segment.to_string()
        } else {
            format!("{at}.{segment}")
        }
    };
    match node {
        Tree::Float(f) if !f.is_finite() => Some(format!("{f} at `{at}`")),
        Tree::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, item)| find_non_finite(item, &child(&i.to_string()))),
        Tree::Map(entries) => entries.iter().find_map(|(key, item)| {
            let segment = match key {
                Tree::Text(text) => text.clone(),
                other => format!("{other:?}"),
            };
            find_non_finite(item, &child(&segment))
        }),
        Tree::Tag(_, inner) => find_non_finite(inner, at),
        _ => None,
    }
}

/// Bytes → KiB rounded half-to-even to two decimals, always printed with at
/// least one fractional digit (`2048` → `"2.0"`, `1000` → `"0.98"`,
/// `128` → `"0.12"`).
fn format_kb(bytes: u64) -> String {
    // bytes * 100 / 1024 is exact in f64, so ties are detected exactly.
    let kb = (bytes as f64 * 100.0 / 1024.0).round_ties_even() / 100.0;
    if kb.fract() == 0.0 {
        format!("{kb:.1}")
    } else {
        format!("{kb}")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
