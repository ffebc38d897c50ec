use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use cilgraph::{LoadContext, LoadOptions, Module, ProjectionMode};

use crate::app::GlobalOptions;

/// File extensions tried, in order, for a referenced module in a search directory.
const MODULE_EXTENSIONS: [&str; 2] = ["dll", "winmd"];

/// Build a context whose path resolver looks through the `--search` directories.
pub fn open_context(opts: &GlobalOptions) -> LoadContext {
    let projection = if opts.projection {
        ProjectionMode::ApplyPlatformProjection
    } else {
        ProjectionMode::None
    };

    let search = opts.search.clone();
    let options = LoadOptions::new()
        .projection(projection)
        .with_path_resolver(move |name| locate_module(&search, name));

    LoadContext::with_options(options)
}

/// Load `path` into a fresh context and finalize it.
pub fn load_module(path: &Path, opts: &GlobalOptions) -> anyhow::Result<(LoadContext, Arc<Module>)> {
    let context = open_context(opts);
    let module = context
        .request_load_path(path)
        .with_context(|| format!("failed to load module: {}", path.display()))?;
    context
        .finalize()
        .with_context(|| format!("failed to finalize context for: {}", path.display()))?;

    Ok((context, module))
}

/// The first `<dir>/<name>.<ext>` that exists.
pub fn locate_module(search: &[PathBuf], name: &str) -> Option<PathBuf> {
    search.iter().find_map(|dir| {
        MODULE_EXTENSIONS
            .iter()
            .map(|extension| dir.join(format!("{name}.{extension}")))
            .find(|candidate| candidate.is_file())
    })
}
