//! Handler stub emission
//!
//! Each function resource gets a small CommonJS module that instantiates the
//! compiled class and forwards the invocation to its `run` method.

use crate::error::SynthesisError;
use crate::project::Project;
use std::fs;
use std::path::{Component, Path, PathBuf};
use stratus_annotations::ResourceDescriptor;

/// Writes handler stubs into a project's handler directory
#[derive(Debug, Clone)]
pub struct HandlerEmitter {
    handlers_dir: String,
}

impl HandlerEmitter {
    /// Create emitter writing into `<project>/<handlers_dir>`
    #[must_use]
    pub fn new(handlers_dir: impl Into<String>) -> Self {
        Self {
            handlers_dir: handlers_dir.into(),
        }
    }

    /// Stub path for `descriptor` within `project`
    #[must_use]
    pub fn stub_path(&self, project: &Project, descriptor: &ResourceDescriptor) -> PathBuf {
        project
            .root
            .join(&self.handlers_dir)
            .join(format!("{}.js", descriptor.handler_module()))
    }

    /// Import path of the compiled class, relative to the handler directory
    ///
    /// `<project>/src/api/items.ts` with `rootDir: src`, `outDir: dist` gives
    /// `../dist/api/items.js`.
    #[must_use]
    pub fn module_path(&self, project: &Project, source: &Path) -> String {
        let source_root = project.root.join(&project.tsconfig.root_dir);
        let relative = source
            .strip_prefix(&source_root)
            .or_else(|_| source.strip_prefix(&project.root))
            .unwrap_or(source)
            .with_extension("js");

        let up = "../".repeat(Path::new(&self.handlers_dir).components().count().max(1));
        let segments: Vec<String> = project
            .tsconfig
            .out_dir
            .components()
            .chain(relative.components())
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        format!("{up}{}", segments.join("/"))
    }

    /// Stub source for `descriptor`
    #[must_use]
    pub fn render(&self, project: &Project, descriptor: &ResourceDescriptor) -> String {
        let class = &descriptor.origin.declaration;
        let module = self.module_path(project, &descriptor.origin.file);
        format!(
            "const handlerModule = require('{module}');\n\
             const {class} = handlerModule.{class} || handlerModule.default;\n\
             \n\
             exports.run = async (event, context) => {{\n\
             \x20 const handler = new {class}();\n\
             \x20 return handler.run(event, context);\n\
             }};\n"
        )
    }

    /// Write the stub for `descriptor`, creating the handler directory
    ///
    /// # Errors
    /// [`SynthesisError::Io`] if the directory or file cannot be written.
    pub fn emit(
        &self,
        project: &Project,
        descriptor: &ResourceDescriptor,
    ) -> Result<PathBuf, SynthesisError> {
        let path = self.stub_path(project, descriptor);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| SynthesisError::io_error(dir, e))?;
        }
        fs::write(&path, self.render(project, descriptor))
            .map_err(|e| SynthesisError::io_error(&path, e))?;
        tracing::debug!("Wrote handler {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::TsConfig;
    use stratus_annotations::{Origin, ResourceKind};
    use stratus_template::Mapping;

    fn project(root: &Path) -> Project {
        Project {
            root: root.to_path_buf(),
            name: Some("items".to_string()),
            tsconfig: TsConfig::default(),
        }
    }

    fn descriptor(root: &Path, file: &str, class: &str) -> ResourceDescriptor {
        ResourceDescriptor {
            name: format!("{class}Function"),
            kind: ResourceKind::Function,
            properties: Mapping::new(),
            origin: Origin::new(root, root.join(file), class),
        }
    }

    #[test]
    fn module_path_maps_root_to_out_dir() {
        let root = Path::new("/work/items");
        let emitter = HandlerEmitter::new("handlers");
        assert_eq!(
            emitter.module_path(&project(root), &root.join("src/api/items.ts")),
            "../dist/api/items.js"
        );
        assert_eq!(
            emitter.module_path(&project(root), &root.join("lib/other.tsx")),
            "../dist/lib/other.js"
        );
    }

    #[test]
    fn render_stub() {
        let root = Path::new("/work/items");
        let emitter = HandlerEmitter::new("handlers");
        let stub = emitter.render(&project(root), &descriptor(root, "src/items.ts", "GetItems"));
        assert_eq!(
            stub,
            "const handlerModule = require('../dist/items.js');\n\
             const GetItems = handlerModule.GetItems || handlerModule.default;\n\
             \n\
             exports.run = async (event, context) => {\n\
             \x20 const handler = new GetItems();\n\
             \x20 return handler.run(event, context);\n\
             };\n"
        );
    }

    #[test]
    fn emit_writes_lowercased_file() {
        let dir = tempfile::tempdir().unwrap();
        let emitter = HandlerEmitter::new("handlers");
        let path = emitter
            .emit(&project(dir.path()), &descriptor(dir.path(), "src/items.ts", "GetItems"))
            .unwrap();
        assert_eq!(path, dir.path().join("handlers/getitems_function.js"));
        assert!(fs::read_to_string(path).unwrap().contains("new GetItems()"));
    }
}
