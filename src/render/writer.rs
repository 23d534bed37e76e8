//! Writes rendered pages to the output directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::runtime::Runtime;

use super::RenderedPage;

/// Output-directory writer. The output directory is recreated on every run;
/// the tool is stateless across invocations.
pub struct SiteWriter<'a, R: Runtime> {
    runtime: &'a R,
    outdir: PathBuf,
}

impl<'a, R: Runtime> SiteWriter<'a, R> {
    pub fn new(runtime: &'a R, outdir: PathBuf) -> Self {
        Self { runtime, outdir }
    }

    /// Replace the output directory with the rendered pages.
    pub fn write_site(&self, pages: &[RenderedPage]) -> Result<()> {
        if self.runtime.exists(&self.outdir) {
            self.runtime
                .remove_dir_all(&self.outdir)
                .context("Failed to clear output directory")?;
        }
        self.runtime
            .create_dir_all(&self.outdir)
            .context("Failed to create output directory")?;

        for page in pages {
            let path = self.outdir.join(&page.filename);
            debug!("writing {}", path.display());
            self.runtime.write(&path, page.html.as_bytes())?;
        }

        info!("wrote {} pages to {}", pages.len(), self.outdir.display());
        Ok(())
    }

    /// Copy a `layout/` asset directory from the template dir, if one
    /// exists. Carried over from the original repoview layout convention.
    pub fn copy_layout(&self, template_dir: &Path) -> Result<()> {
        let src = template_dir.join("layout");
        if !self.runtime.is_dir(&src) {
            return Ok(());
        }
        info!("copying layout from {}", src.display());
        self.copy_tree(&src, &self.outdir.join("layout"))
    }

    fn copy_tree(&self, src: &Path, dest: &Path) -> Result<()> {
        self.runtime.create_dir_all(dest)?;
        for entry in self.runtime.read_dir(src)? {
            let name = entry
                .file_name()
                .with_context(|| format!("Bad path in template layout: {}", entry.display()))?;
            let target = dest.join(name);
            if self.runtime.is_dir(&entry) {
                self.copy_tree(&entry, &target)?;
            } else {
                self.runtime.copy(&entry, &target)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::{always, eq};

    fn page(filename: &str) -> RenderedPage {
        RenderedPage {
            filename: filename.to_string(),
            html: format!("<html>{filename}</html>"),
        }
    }

    #[test]
    fn test_write_site_recreates_outdir() {
        let mut runtime = MockRuntime::new();
        let outdir = PathBuf::from("/out");

        runtime
            .expect_exists()
            .with(eq(outdir.clone()))
            .returning(|_| true);
        runtime
            .expect_remove_dir_all()
            .with(eq(outdir.clone()))
            .times(1)
            .returning(|_| Ok(()));
        runtime
            .expect_create_dir_all()
            .with(eq(outdir.clone()))
            .times(1)
            .returning(|_| Ok(()));
        runtime
            .expect_write()
            .with(eq(PathBuf::from("/out/index.html")), always())
            .times(1)
            .returning(|_, _| Ok(()));
        runtime
            .expect_write()
            .with(eq(PathBuf::from("/out/bash.html")), always())
            .times(1)
            .returning(|_, _| Ok(()));

        let writer = SiteWriter::new(&runtime, outdir);
        writer
            .write_site(&[page("index.html"), page("bash.html")])
            .unwrap();
    }

    #[test]
    fn test_copy_layout_noop_without_layout_dir() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_is_dir()
            .with(eq(PathBuf::from("/templates/layout")))
            .returning(|_| false);

        let writer = SiteWriter::new(&runtime, PathBuf::from("/out"));
        writer.copy_layout(Path::new("/templates")).unwrap();
    }

    #[test]
    fn test_copy_layout_copies_files() {
        let mut runtime = MockRuntime::new();
        let layout = PathBuf::from("/templates/layout");

        runtime
            .expect_is_dir()
            .with(eq(layout.clone()))
            .returning(|_| true);
        runtime
            .expect_create_dir_all()
            .with(eq(PathBuf::from("/out/layout")))
            .returning(|_| Ok(()));
        runtime
            .expect_read_dir()
            .with(eq(layout.clone()))
            .returning(|_| Ok(vec![PathBuf::from("/templates/layout/style.css")]));
        runtime
            .expect_is_dir()
            .with(eq(PathBuf::from("/templates/layout/style.css")))
            .returning(|_| false);
        runtime
            .expect_copy()
            .with(
                eq(PathBuf::from("/templates/layout/style.css")),
                eq(PathBuf::from("/out/layout/style.css")),
            )
            .times(1)
            .returning(|_, _| Ok(()));

        let writer = SiteWriter::new(&runtime, PathBuf::from("/out"));
        writer.copy_layout(Path::new("/templates")).unwrap();
    }
}
