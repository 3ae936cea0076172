//! Synthesis driver
//!
//! One run: load the template (writing its backup), scan every opted-in
//! project, assemble one descriptor per annotated class, then merge in
//! memory, emit handler stubs and save. Any fatal error returns before the
//! first write after the backup.

use crate::config::SynthesisConfig;
use crate::error::{ProjectSkip, SynthesisError};
use crate::handler::HandlerEmitter;
use crate::project::{source_matcher, Project, ProjectDiscovery};
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use stratus_annotations::{
    AnnotationExtractor, AnnotationRecord, CapabilityRegistry, ResourceAssembler,
    ResourceDescriptor,
};
use stratus_scan::{DeclarationWalker, ParsedSource};
use stratus_template::{DocumentStore, TemplateResource};

/// A resource written into the template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedResource {
    /// Logical name
    pub name: String,
    /// Resource `Type`
    pub resource_type: String,
    /// True if an entry of that name existed before the run
    pub replaced: bool,
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesisReport {
    /// Template written
    pub template: PathBuf,
    /// Backup taken on load
    pub backup: PathBuf,
    /// Project directories scanned
    pub projects: Vec<PathBuf>,
    /// Projects skipped, with reason
    pub skipped: Vec<ProjectSkip>,
    /// Source files scanned
    pub files: usize,
    /// Resources merged, in merge order
    pub resources: Vec<MergedResource>,
    /// Handler stubs written
    pub handlers: Vec<PathBuf>,
}

impl Display for SynthesisReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Template: {}", self.template.display())?;
        writeln!(f, "Backup: {}", self.backup.display())?;
        writeln!(
            f,
            "Projects: {} scanned, {} skipped, {} files",
            self.projects.len(),
            self.skipped.len(),
            self.files
        )?;
        for skip in &self.skipped {
            writeln!(f, "  skipped {skip}")?;
        }
        writeln!(f, "Resources: {}", self.resources.len())?;
        for resource in &self.resources {
            let action = if resource.replaced { "replaced" } else { "added" };
            writeln!(f, "  {} ({}) {action}", resource.name, resource.resource_type)?;
        }
        write!(f, "Handlers: {}", self.handlers.len())
    }
}

/// Descriptor together with the project it came from
#[derive(Debug)]
struct Synthesized {
    project: usize,
    descriptor: ResourceDescriptor,
}

/// Runs scan → extract → assemble → merge for one template
#[derive(Debug, Clone)]
pub struct SynthesisDriver<'r> {
    config: SynthesisConfig,
    registry: &'r CapabilityRegistry,
}

impl SynthesisDriver<'static> {
    /// Create driver using the standard capability registry
    #[must_use]
    pub fn new(config: SynthesisConfig) -> Self {
        Self::with_registry(config, CapabilityRegistry::global())
    }
}

impl<'r> SynthesisDriver<'r> {
    /// Create driver with a custom capability registry
    #[must_use]
    pub fn with_registry(config: SynthesisConfig, registry: &'r CapabilityRegistry) -> Self {
        Self { config, registry }
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Execute one run
    ///
    /// # Errors
    /// - [`SynthesisError::Config`] / [`SynthesisError::InvalidGlob`] for bad
    ///   configuration
    /// - [`SynthesisError::Template`] if the template cannot be loaded,
    ///   merged or saved
    /// - [`SynthesisError::Scan`] if a source cannot be read
    /// - [`SynthesisError::Annotation`] for the first malformed capability
    /// - [`SynthesisError::Io`] for discovery or handler write failures
    pub fn run(&self) -> Result<SynthesisReport, SynthesisError> {
        self.config.validate()?;
        let matcher = source_matcher(&self.config.source_glob)?;
        let root = fs::canonicalize(&self.config.project_root)
            .map_err(|e| SynthesisError::io_error(&self.config.project_root, e))?;

        let store = DocumentStore::new(self.config.template_path())
            .with_backup_suffix(&self.config.backup_suffix);
        let mut document = store.load()?;
        tracing::info!(
            "Loaded {} (backup at {})",
            store.path().display(),
            store.backup_path().display()
        );

        let mut report = SynthesisReport {
            template: store.path().to_path_buf(),
            backup: store.backup_path(),
            ..SynthesisReport::default()
        };

        let mut projects = Vec::new();
        let mut synthesized = Vec::new();
        for discovered in ProjectDiscovery::new(&root, &self.config.marker_package).discover()? {
            let project = match discovered {
                Ok(project) => project,
                Err(skip) => {
                    tracing::warn!("Skipping project: {}", skip);
                    report.skipped.push(skip);
                    continue;
                }
            };

            let sources = project.sources(&matcher);
            if sources.is_empty() {
                let skip = ProjectSkip::NoSources {
                    project: project.root.clone(),
                    glob: self.config.source_glob.clone(),
                };
                tracing::warn!("Skipping project: {}", skip);
                report.skipped.push(skip);
                continue;
            }

            tracing::info!(
                "Scanning {} ({} files)",
                project.display_name(),
                sources.len()
            );
            for source in &sources {
                for descriptor in self.scan_file(&project, source)? {
                    synthesized.push(Synthesized {
                        project: projects.len(),
                        descriptor,
                    });
                }
            }
            report.files += sources.len();
            report.projects.push(project.root.clone());
            projects.push(project);
        }

        warn_duplicates(&synthesized);

        let merge = document.merge(synthesized.iter().map(|item| &item.descriptor))?;
        for item in &synthesized {
            let name = item.descriptor.logical_name();
            let replaced = merge.replaced.iter().any(|n| n == name);
            tracing::info!(
                "{} {} ({})",
                if replaced { "Replaced" } else { "Added" },
                name,
                item.descriptor.resource_type()
            );
            report.resources.push(MergedResource {
                name: name.to_string(),
                resource_type: item.descriptor.resource_type().to_string(),
                replaced,
            });
        }

        if self.config.emit_handlers {
            let emitter = HandlerEmitter::new(&self.config.handlers_dir);
            for item in &synthesized {
                report
                    .handlers
                    .push(emitter.emit(&projects[item.project], &item.descriptor)?);
            }
        }

        store.save(&document)?;
        tracing::info!(
            "Wrote {} resource(s) to {}",
            report.resources.len(),
            store.path().display()
        );
        Ok(report)
    }

    /// Walk one file and assemble its descriptors in declaration order
    fn scan_file(
        &self,
        project: &Project,
        path: &Path,
    ) -> Result<Vec<ResourceDescriptor>, SynthesisError> {
        let parsed = ParsedSource::read(path)?;
        let extractor = AnnotationExtractor::new(self.registry, &project.root, path);

        // (declaration_index, class name, records)
        let mut classes: Vec<(usize, String, Vec<AnnotationRecord>)> = Vec::new();
        for binding in DeclarationWalker::new(self.registry).walk(&parsed) {
            let record = extractor
                .extract(&binding.declaration, &binding.capability, &binding.parameters)
                .map_err(|source| SynthesisError::Annotation {
                    file: path.to_path_buf(),
                    line: binding.line,
                    declaration: binding.declaration.clone(),
                    source,
                })?;
            let Some(record) = record else { continue };

            match classes.last_mut() {
                Some((index, _, records)) if *index == binding.declaration_index => {
                    records.push(record);
                }
                _ => classes.push((binding.declaration_index, binding.declaration, vec![record])),
            }
        }

        let assembler = ResourceAssembler::new()
            .with_default_runtime(&self.config.default_runtime)
            .with_handlers_dir(&self.config.handlers_dir);
        let descriptors: Vec<_> = classes
            .iter()
            .filter_map(|(_, declaration, records)| assembler.assemble(declaration, records))
            .collect();
        tracing::debug!(
            "{}: {} class(es), {} resource(s)",
            path.display(),
            classes.len(),
            descriptors.len()
        );
        Ok(descriptors)
    }
}

fn warn_duplicates(synthesized: &[Synthesized]) {
    let mut seen: HashMap<&str, &Path> = HashMap::new();
    for item in synthesized {
        let descriptor = &item.descriptor;
        if let Some(first) = seen.insert(&descriptor.name, &descriptor.origin.file) {
            tracing::warn!(
                "Resource {} is declared in both {} and {}; the later one wins",
                descriptor.name,
                first.display(),
                descriptor.origin.file.display()
            );
        }
    }
}
