use crate::{
    layout::{self, Layouts},
    preview::preview_as_tree,
    scaffold::{self, Scaffolder},
    spec::PathSpec,
};
use colored::Colorize;
use std::path::Path;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum HakoError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Layout(#[from] layout::LayoutError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Scaffold(#[from] scaffold::ScaffoldError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Spec(#[from] crate::spec::SpecError),
}

/// What an `apply` run should scaffold and how.
#[derive(Debug, Default)]
pub struct ScaffoldRequest<'a> {
    /// Base directory, the current working directory when `None`.
    pub base: Option<&'a Path>,
    /// Named layout whose entries are scaffolded first.
    pub layout: Option<&'a str>,
    /// Optional layouts file merged over the built-in layouts.
    pub layouts_file: Option<&'a Path>,
    /// Extra specs, scaffolded after the layout's entries.
    pub specs: Vec<String>,
    /// Stop at the first failing spec, overriding the layouts file settings.
    pub abort_on_error: bool,
}

/// Scaffolds the requested layout and specs into the base directory.
///
/// # Errors
///
/// Returns a [`HakoError`] if:
///
/// - The layouts file could not be read or parsed.
/// - The requested layout does not exist.
/// - The base directory cannot be resolved.
/// - A spec fails while aborting on error is in effect.
pub fn scaffold(request: ScaffoldRequest<'_>) -> Result<(), HakoError> {
    let layouts = Layouts::load(request.layouts_file)?;

    let mut specs = match request.layout {
        Some(name) => layouts.get(name)?.entries.clone(),
        None => Vec::new(),
    };
    specs.extend(request.specs);

    let continue_on_error = layouts.settings.continue_on_error && !request.abort_on_error;

    let scaffolder = Scaffolder::new(request.base)?.continue_on_error(continue_on_error);

    log::debug!(
        "applying {} specs (continue on error: {})",
        specs.len(),
        continue_on_error
    );

    scaffolder.apply(&specs)?;

    Ok(())
}

/// Prints every known layout with its description.
///
/// # Errors
///
/// Returns a [`HakoError`] if the layouts file could not be read or parsed.
pub fn list_layouts(layouts_file: Option<&Path>) -> Result<(), HakoError> {
    let layouts = Layouts::load(layouts_file)?;

    for (name, info) in &layouts.layouts {
        match &info.description {
            Some(description) => println!("{} {}", name.bold(), description),
            None => println!("{}", name.bold()),
        }
    }

    Ok(())
}

/// Prints the layout `name` as a tree.
///
/// # Errors
///
/// Returns a [`HakoError`] if the layouts file is unusable, the layout does not exist, or one
/// of its entries is not a valid spec.
pub fn show_layout(name: &str, layouts_file: Option<&Path>) -> Result<(), HakoError> {
    let layouts = Layouts::load(layouts_file)?;

    let specs = layouts
        .get(name)?
        .entries
        .iter()
        .map(|entry| PathSpec::classify(entry))
        .collect::<Result<Vec<_>, _>>()?;

    preview_as_tree(&specs, Path::new(name));

    Ok(())
}
