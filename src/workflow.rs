use crate::config::WorkflowConfig;
use crate::constants::WORKFLOWS_DIR;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// render the Node.js deployment workflow for one app directory
pub fn render(workflow: &WorkflowConfig) -> String {
    let WorkflowConfig {
        app_name,
        app_dir,
        node_version,
        ..
    } = workflow;

    format!(
        r#"name: Deploy {app_name} to Railway

on:
  push:
    branches: [ main ]
    paths:
      - '{app_dir}/**'
  pull_request:
    branches: [ main ]

jobs:
  deploy:
    runs-on: ubuntu-latest

    steps:
    - uses: actions/checkout@v3

    - name: Setup Node.js
      uses: actions/setup-node@v3
      with:
        node-version: '{node_version}'
        cache: 'npm'
        cache-dependency-path: {app_dir}/package-lock.json

    - name: Install dependencies
      run: |
        cd {app_dir}
        npm ci

    - name: Run tests
      run: |
        cd {app_dir}
        npm test

    - name: Deploy to Railway
      if: github.ref == 'refs/heads/main'
      run: |
        # Railway deployment commands will be added here
        echo "Deploying to Railway..."
"#
    )
}

/// write the rendered workflow under `<root>/.github/workflows/`, returning its path
pub fn write(root: &Path, workflow: &WorkflowConfig) -> Result<PathBuf> {
    let dir = root.join(WORKFLOWS_DIR);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory {}", dir.display()))?;

    let path = dir.join(&workflow.file_name);
    fs::write(&path, render(workflow))
        .with_context(|| format!("failed to write workflow {}", path.display()))?;
    Ok(path)
}
