//! Import orchestrator
//!
//! ```text
//! Idle -> Parsing -> Previewing -> Importing -> Complete
//!                    ^   |   ^         |
//!   (re-upload) -----+   |   +---------+ (persistence failed)
//!                        v
//!                      Idle (start over)
//! ```

use crate::MenuImporter;
use crate::categories::CategoryResolver;
use crate::error::{ImportError, PersistenceError};
use crate::reader::SourceFormat;
use crate::result::ParsedImportResult;
use crate::store::{MenuStore, NewMenuItem};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Parsing progress, in rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(processed: usize, total: usize) -> Self {
        Self { processed, total }
    }

    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (self.processed.min(self.total) * 100 / self.total) as u8
    }
}

/// Outcome of a successful import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub categories_created: usize,
    pub categories_reused: usize,
    pub items_inserted: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportState {
    Idle,
    Parsing,
    Previewing(ParsedImportResult),
    Importing,
    Complete(ImportSummary),
}

impl ImportState {
    pub fn name(&self) -> &'static str {
        match self {
            ImportState::Idle => "idle",
            ImportState::Parsing => "parsing",
            ImportState::Previewing(_) => "previewing",
            ImportState::Importing => "importing",
            ImportState::Complete(_) => "complete",
        }
    }
}

/// One user's import flow. Holds the parsed result between preview and
/// confirmation.
pub struct ImportSession {
    importer: MenuImporter,
    state: ImportState,
}

impl ImportSession {
    pub fn new(importer: MenuImporter) -> Self {
        Self {
            importer,
            state: ImportState::Idle,
        }
    }

    pub fn state(&self) -> &ImportState {
        &self.state
    }

    /// The parsed result while previewing
    pub fn preview(&self) -> Option<&ParsedImportResult> {
        match &self.state {
            ImportState::Previewing(result) => Some(result),
            _ => None,
        }
    }

    /// Whether the "confirm import" action is enabled
    pub fn can_confirm(&self) -> bool {
        self.preview().is_some_and(ParsedImportResult::can_confirm)
    }

    /// Parse a file from disk. Valid from `Idle` and, as a re-upload, from
    /// `Previewing`.
    pub fn load_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        progress: &mut dyn FnMut(Progress),
    ) -> Result<&ParsedImportResult, ImportError> {
        self.begin_parsing()?;
        let parsed = self.importer.parse_file(path, progress);
        self.finish_parsing(parsed)
    }

    /// Parse an in-memory upload with a declared format
    pub fn load_bytes(
        &mut self,
        bytes: &[u8],
        format: SourceFormat,
        progress: &mut dyn FnMut(Progress),
    ) -> Result<&ParsedImportResult, ImportError> {
        self.begin_parsing()?;
        let parsed = self.importer.parse_bytes(bytes, format, progress);
        self.finish_parsing(parsed)
    }

    fn begin_parsing(&mut self) -> Result<(), ImportError> {
        match self.state {
            ImportState::Idle | ImportState::Previewing(_) => {
                self.state = ImportState::Parsing;
                tracing::info!("parsing upload");
                Ok(())
            }
            _ => Err(ImportError::InvalidState {
                action: "load a file",
                state: self.state.name(),
            }),
        }
    }

    fn finish_parsing(
        &mut self,
        parsed: Result<ParsedImportResult, crate::error::FileFormatError>,
    ) -> Result<&ParsedImportResult, ImportError> {
        match parsed {
            Ok(result) => {
                self.state = ImportState::Previewing(result);
                let ImportState::Previewing(result) = &self.state else {
                    unreachable!("state was just set to Previewing");
                };
                Ok(result)
            }
            Err(e) => {
                // Fatal: drop everything and go back to the upload step
                tracing::warn!(error = %e, "upload rejected");
                self.state = ImportState::Idle;
                Err(ImportError::FileFormat(e))
            }
        }
    }

    /// Persist the previewed result. On failure the session returns to
    /// `Previewing` with the same result, so the call can be retried.
    pub async fn confirm_import(
        &mut self,
        store: &dyn MenuStore,
        vendor_id: &str,
    ) -> Result<ImportSummary, ImportError> {
        let result = match std::mem::replace(&mut self.state, ImportState::Importing) {
            ImportState::Previewing(result) if result.can_confirm() => result,
            other => {
                let err = match &other {
                    ImportState::Importing => ImportError::AlreadyImporting,
                    ImportState::Previewing(result) if result.has_errors() => {
                        ImportError::ValidationFailed {
                            count: result.errors.len(),
                        }
                    }
                    ImportState::Previewing(_) => ImportError::NothingToImport,
                    state => ImportError::InvalidState {
                        action: "confirm import",
                        state: state.name(),
                    },
                };
                self.state = other;
                return Err(err);
            }
        };

        tracing::info!(
            vendor = vendor_id,
            items = result.menu_items.len(),
            categories = result.categories.len(),
            "importing menu"
        );

        match persist(store, vendor_id, &result, self.importer.resolver()).await {
            Ok(summary) => {
                tracing::info!(?summary, "import complete");
                self.state = ImportState::Complete(summary.clone());
                Ok(summary)
            }
            Err(e) => {
                tracing::warn!(error = %e, "import failed, keeping preview");
                self.state = ImportState::Previewing(result);
                Err(ImportError::Persistence(e))
            }
        }
    }

    /// "Start Over" from the preview
    pub fn start_over(&mut self) -> Result<(), ImportError> {
        match self.state {
            ImportState::Previewing(_) => {
                self.state = ImportState::Idle;
                Ok(())
            }
            _ => Err(ImportError::InvalidState {
                action: "start over",
                state: self.state.name(),
            }),
        }
    }

    /// "Import another file" after a successful import
    pub fn import_another(&mut self) -> Result<(), ImportError> {
        match self.state {
            ImportState::Complete(_) => {
                self.state = ImportState::Idle;
                Ok(())
            }
            _ => Err(ImportError::InvalidState {
                action: "import another file",
                state: self.state.name(),
            }),
        }
    }

    /// Discard all in-flight state, whatever the current step
    pub fn reset(&mut self) {
        self.state = ImportState::Idle;
    }
}

/// Resolve categories first, then insert all items in one batch
async fn persist(
    store: &dyn MenuStore,
    vendor_id: &str,
    result: &ParsedImportResult,
    resolver: CategoryResolver,
) -> Result<ImportSummary, PersistenceError> {
    let mut summary = ImportSummary::default();
    let mut ids = HashMap::new();

    for category in &result.categories {
        let resolution = store
            .resolve_or_create_category(vendor_id, &category.name, category.display_order)
            .await?;
        if resolution.created {
            summary.categories_created += 1;
        } else {
            summary.categories_reused += 1;
        }
        ids.insert(resolver.key(&category.name), resolution.id);
    }

    let mut items = Vec::with_capacity(result.menu_items.len());
    for record in &result.menu_items {
        let category_id = ids.get(&resolver.key(&record.category_name)).ok_or_else(|| {
            PersistenceError::Store(format!(
                "category '{}' was not resolved",
                record.category_name
            ))
        })?;
        items.push(NewMenuItem::from_record(record, *category_id));
    }

    summary.items_inserted = items.len();
    store.insert_menu_items(vendor_id, items).await?;
    Ok(summary)
}
