//! Renderer/writer collaborator.
//!
//! Consumes the finished [`SiteModel`](crate::site::SiteModel) and a
//! template set and turns them into HTML files. All the data-shape decisions
//! already happened upstream; this layer is deliberately thin.

mod writer;

use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use tera::Tera;

use crate::runtime::Runtime;
use crate::site::{INDEX_FILE, SiteModel};

pub use writer::SiteWriter;

const TEMPLATE_INDEX: &str = "index.html";
const TEMPLATE_PKG: &str = "package.html";
const TEMPLATE_GRP: &str = "group.html";
const TEMPLATE_LETTER: &str = "letter.html";

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub filename: String,
    pub html: String,
}

/// Presentation-only values that never reach the aggregation core: the
/// repository link and feed description shown on the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub link: String,
    pub description: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            link: "https://github.com/rpm-software-management/dnf".to_string(),
            description: "Package, group, and general repository information".to_string(),
        }
    }
}

/// Tera-backed page renderer.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Renderer using the built-in templates.
    pub fn embedded() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (TEMPLATE_INDEX, include_str!("templates/index.html.tera")),
            (TEMPLATE_PKG, include_str!("templates/package.html.tera")),
            (TEMPLATE_GRP, include_str!("templates/group.html.tera")),
            (TEMPLATE_LETTER, include_str!("templates/letter.html.tera")),
        ])?;
        Ok(Renderer { tera })
    }

    /// Renderer using templates from a directory.
    ///
    /// Expects `index.html.tera`, `package.html.tera`, `group.html.tera`,
    /// and `letter.html.tera` to exist there.
    pub fn from_dir<R: Runtime>(runtime: &R, dir: &Path) -> Result<Self> {
        let mut tera = Tera::default();
        for name in [TEMPLATE_INDEX, TEMPLATE_PKG, TEMPLATE_GRP, TEMPLATE_LETTER] {
            let path = dir.join(format!("{name}.tera"));
            let source = runtime
                .read_to_string(&path)
                .with_context(|| format!("Failed to read template {}", path.display()))?;
            tera.add_raw_template(name, &source)
                .with_context(|| format!("Failed to parse template {}", path.display()))?;
        }
        Ok(Renderer { tera })
    }

    /// Render every page descriptor in the model.
    pub fn render_site(
        &self,
        site: &SiteModel,
        options: &RenderOptions,
    ) -> Result<Vec<RenderedPage>> {
        let mut pages = Vec::new();

        pages.push(RenderedPage {
            filename: INDEX_FILE.to_string(),
            html: self.render(TEMPLATE_INDEX, &site.index, site, options)?,
        });
        for letter in &site.letters {
            pages.push(RenderedPage {
                filename: letter.filename.clone(),
                html: self.render(TEMPLATE_LETTER, letter, site, options)?,
            });
        }
        for package in &site.packages {
            pages.push(RenderedPage {
                filename: package.filename.clone(),
                html: self.render(TEMPLATE_PKG, package, site, options)?,
            });
        }
        for group in &site.groups {
            pages.push(RenderedPage {
                filename: group.filename.clone(),
                html: self.render(TEMPLATE_GRP, group, site, options)?,
            });
        }

        debug!("rendered {} pages", pages.len());
        Ok(pages)
    }

    fn render<T: serde::Serialize>(
        &self,
        template: &str,
        page: &T,
        site: &SiteModel,
        options: &RenderOptions,
    ) -> Result<String> {
        let mut context = tera::Context::from_serialize(page)
            .with_context(|| format!("Failed to build context for {template}"))?;
        context.insert("site_title", &site.title);
        context.insert("link", &options.link);
        context.insert("description", &options.description);
        self.tera
            .render(template, &context)
            .with_context(|| format!("Failed to render {template}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{build_group_index, build_letter_index};
    use crate::package::normalize;
    use crate::query::{RawGroup, RawPackage};
    use crate::runtime::RealRuntime;
    use crate::site::assemble;

    fn sample_site() -> SiteModel {
        let raw = vec![
            RawPackage {
                name: "bash".into(),
                version: "5.2".into(),
                release: "1.el9".into(),
                arch: "x86_64".into(),
                buildtime: "1700000000".into(),
                summary: "The GNU Bourne Again shell".into(),
                description: "Bash is a shell <&>".into(),
                ..Default::default()
            },
            RawPackage {
                name: "389-ds-base".into(),
                version: "2.4".into(),
                release: "3.el9".into(),
                arch: "x86_64".into(),
                buildtime: "1690000000".into(),
                summary: "389 Directory Server".into(),
                ..Default::default()
            },
        ];
        let mut warnings = Vec::new();
        let mut packages = normalize(raw, &mut warnings);
        let groups = build_group_index(
            vec![RawGroup {
                id: "shells".into(),
                name: "Shells".into(),
                description: "Command shells".into(),
                members: vec!["bash".into()],
            }],
            &mut packages,
            &mut warnings,
        );
        let letters = build_letter_index(&packages);
        assemble("baseos", "Test Repository", &packages, &letters, &groups, 30)
    }

    fn render_sample(site: &SiteModel) -> Vec<RenderedPage> {
        Renderer::embedded()
            .unwrap()
            .render_site(site, &RenderOptions::default())
            .unwrap()
    }

    #[test]
    fn test_render_produces_one_file_per_page() {
        let site = sample_site();
        let pages = render_sample(&site);

        let names: Vec<_> = pages.iter().map(|p| p.filename.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "index.html",
                "0-9.letter.html",
                "B.letter.html",
                "389-ds-base.html",
                "bash.html",
                "shells.group.html",
            ]
        );
    }

    #[test]
    fn test_index_page_content() {
        let site = sample_site();
        let pages = render_sample(&site);
        let index = &pages[0].html;

        assert!(index.contains("Test Repository"));
        assert!(index.contains("2 packages and 1 groups"));
        assert!(index.contains(r#"<a href="B.letter.html">B</a>"#));
        assert!(index.contains(r#"<a href="shells.group.html">Shells</a>"#));
    }

    #[test]
    fn test_index_page_carries_link_and_description() {
        let site = sample_site();
        let options = RenderOptions {
            link: "https://example.com/repo".into(),
            description: "Nightly package feed".into(),
        };
        let pages = Renderer::embedded()
            .unwrap()
            .render_site(&site, &options)
            .unwrap();
        let index = &pages[0].html;

        assert!(index.contains(r#"<a href="https://example.com/repo">"#));
        assert!(index.contains("Nightly package feed"));
    }

    #[test]
    fn test_index_page_lists_recent_builds() {
        let site = sample_site();
        let pages = render_sample(&site);
        let index = &pages[0].html;

        // bash built later than 389-ds-base, so it is listed first.
        let bash = index.find(r#"<a href="bash.html">bash</a>"#).unwrap();
        let ds = index.find(r#"<a href="389-ds-base.html">389-ds-base</a>"#).unwrap();
        assert!(bash < ds);
    }

    #[test]
    fn test_package_page_escapes_html() {
        let site = sample_site();
        let pages = render_sample(&site);
        let bash = pages
            .iter()
            .find(|p| p.filename == "bash.html")
            .unwrap();

        assert!(bash.html.contains("Bash is a shell &lt;&amp;&gt;"));
        assert!(bash.html.contains("5.2"));
        assert!(bash.html.contains("x86_64"));
    }

    #[test]
    fn test_template_dir_override() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["index.html", "package.html", "group.html", "letter.html"] {
            std::fs::write(
                dir.path().join(format!("{name}.tera")),
                "custom {{ site_title }}",
            )
            .unwrap();
        }

        let site = sample_site();
        let pages = Renderer::from_dir(&RealRuntime, dir.path())
            .unwrap()
            .render_site(&site, &RenderOptions::default())
            .unwrap();
        assert!(pages.iter().all(|p| p.html == "custom Test Repository"));
    }

    #[test]
    fn test_from_dir_reads_through_runtime() {
        let mut runtime = crate::runtime::MockRuntime::new();
        runtime
            .expect_read_to_string()
            .times(4)
            .returning(|_| Ok("stub {{ site_title }}".to_string()));

        let site = sample_site();
        let pages = Renderer::from_dir(&runtime, Path::new("/nowhere"))
            .unwrap()
            .render_site(&site, &RenderOptions::default())
            .unwrap();
        assert!(pages.iter().all(|p| p.html == "stub Test Repository"));
    }

    #[test]
    fn test_from_dir_missing_template_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Renderer::from_dir(&RealRuntime, dir.path()).is_err());
    }
}
