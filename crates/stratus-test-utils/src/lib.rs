//! Testing utilities for the Stratus workspace
//!
//! Temporary project trees with manifests, compiler configuration, sources
//! and a template.

#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const MARKER_PACKAGE: &str = "stratus";

pub const BASE_TEMPLATE: &str = r"AWSTemplateFormatVersion: '2010-09-09'
Transform: AWS::Serverless-2016-10-31
Description: test stack
Resources:
  ItemsTable:
    Type: AWS::Serverless::SimpleTable
  MyRole:
    Type: AWS::IAM::Role
    Properties:
      RoleName: !Sub ${AWS::StackName}-role
Outputs:
  TableName:
    Value: !Ref ItemsTable
  RoleArn:
    Value: !GetAtt MyRole.Arn
";

pub const TSCONFIG: &str = r#"{
  "compilerOptions": {
    "rootDir": "src",
    "outDir": "dist"
  }
}
"#;

/// A temporary directory holding projects and a template
#[derive(Debug)]
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Canonical root path
    pub fn path(&self) -> PathBuf {
        fs::canonicalize(self.dir.path()).unwrap()
    }

    /// Write `content` to `relative`, creating parent directories
    pub fn write(&self, relative: impl AsRef<Path>, content: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, relative: impl AsRef<Path>) -> String {
        fs::read_to_string(self.path().join(relative)).unwrap()
    }

    pub fn exists(&self, relative: impl AsRef<Path>) -> bool {
        self.path().join(relative).exists()
    }

    /// Opted-in project with `package.json` and `tsconfig.json`
    pub fn project(&self, relative: &str, name: &str) -> PathBuf {
        self.manifest(relative, name, &[MARKER_PACKAGE]);
        self.write(Path::new(relative).join("tsconfig.json"), TSCONFIG);
        self.path().join(relative)
    }

    /// `package.json` depending on `dependencies`
    pub fn manifest(&self, relative: &str, name: &str, dependencies: &[&str]) -> PathBuf {
        let deps: serde_json::Map<String, serde_json::Value> = dependencies
            .iter()
            .map(|dep| ((*dep).to_string(), serde_json::Value::from("^1.0.0")))
            .collect();
        let manifest = serde_json::json!({
            "name": name,
            "version": "1.0.0",
            "dependencies": deps,
        });
        self.write(
            Path::new(relative).join("package.json"),
            &serde_json::to_string_pretty(&manifest).unwrap(),
        )
    }

    /// Source file under `<project>/src`
    pub fn source(&self, project: &str, file: &str, content: &str) -> PathBuf {
        self.write(Path::new(project).join("src").join(file), content)
    }

    /// `template.yaml` at the workspace root
    pub fn template(&self, content: &str) -> PathBuf {
        self.write("template.yaml", content)
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
