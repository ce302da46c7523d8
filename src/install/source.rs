use std::path::Path;

use super::archive;
use super::context::RunContext;
use super::executor::{AttemptError, run};
use crate::common::command::Invocation;
use crate::common::git;
use crate::common::progress::create_spinner;
use crate::registry::ToolSpec;

pub(super) fn install(
    ctx: &mut RunContext,
    tool: &ToolSpec,
    url: &str,
    build: &str,
) -> Result<(), AttemptError> {
    let checkout = ctx.scratch.subdir(tool.name)?.join("src");

    let pb = create_spinner(format!("Cloning {}...", url));
    let cloned = git::shallow_clone(url, &checkout);
    pb.finish_and_clear();
    cloned?;

    let pb = create_spinner(format!("Building {}...", tool.name));
    let built = build_in(&checkout, build);
    pb.finish_and_clear();
    built?;

    install_built(&checkout, tool.binary, &ctx.paths.bin_dir)
}

fn build_in(checkout: &Path, build: &str) -> Result<(), AttemptError> {
    run(&Invocation::new("sh").args(["-c", build]).dir(checkout)).map(|_| ())
}

/// Copy the executable named `binary` from the build tree into `bin_dir`.
fn install_built(checkout: &Path, binary: &str, bin_dir: &Path) -> Result<(), AttemptError> {
    let built = archive::find_file(checkout, &[binary], true).ok_or_else(|| {
        AttemptError::BinaryNotFound {
            binary: binary.to_string(),
        }
    })?;
    archive::install_executable(&built, &bin_dir.join(binary))?;
    Ok(())
}
