//! Showing figures in the host browser.

use log::{info, warn};

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::Result;
use crate::figure::Figure;

/// Where [`show`] writes the page for a figure: a file in the system temp directory, named
/// after the figure title.
pub fn html_path_for(fig: &Figure) -> PathBuf {
    let slug: String = fig
        .layout
        .title
        .text
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let slug = slug.trim_matches('_');
    let name = if slug.is_empty() { "figure" } else { slug };
    env::temp_dir().join(format!("blmm_surfplot_{}.html", name))
}

/// Write the figure to an HTML page and open it in the default browser.
///
/// Opening the browser is best effort: a failed launch is logged, and the path of the
/// written page is returned anyway so the caller can open it by hand.
pub fn show(fig: &Figure) -> Result<PathBuf> {
    let path = html_path_for(fig);
    fig.write_html(&path)?;
    info!("Wrote figure to '{}'.", path.display());

    open_or_warn(&path);
    Ok(path)
}

/// Open a written page in the browser, logging a warning if that fails.
///
/// Returns whether the browser was launched. The page exists either way, so a failed launch
/// is not an error.
pub fn open_or_warn(path: &Path) -> bool {
    report_launch(path, open_in_browser(path))
}

fn report_launch(path: &Path, launched: io::Result<()>) -> bool {
    match launched {
        Ok(()) => true,
        Err(err) => {
            warn!("Could not open '{}' in a browser: {}", path.display(), err);
            false
        }
    }
}

/// Open a file with the platform's default handler.
pub fn open_in_browser(path: &Path) -> io::Result<()> {
    let mut cmd = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.arg("/C").arg("start").arg("");
        c
    } else if cfg!(target_os = "macos") {
        Command::new("open")
    } else {
        Command::new("xdg-open")
    };
    cmd.arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::figure::{Layout, Title};

    #[test]
    fn pages_are_named_after_the_title() {
        let fig = Figure::new(Layout {
            title: Title::new("Brain Surface Visualization: blmm_vox_beta, Volume 0"),
            ..Layout::default()
        });
        let path = html_path_for(&fig);
        assert_eq!(env::temp_dir(), path.parent().unwrap());
        assert_eq!(
            "blmm_surfplot_brain_surface_visualization__blmm_vox_beta__volume_0.html",
            path.file_name().unwrap().to_string_lossy()
        );
    }

    #[test]
    fn failed_browser_launches_are_not_errors() {
        let path = Path::new("blmm_surfplot_figure.html");
        let err = io::Error::new(io::ErrorKind::NotFound, "xdg-open not found");
        assert!(!report_launch(path, Err(err)));
        assert!(report_launch(path, Ok(())));
    }

    #[test]
    fn untitled_figures_get_a_default_name() {
        let path = html_path_for(&Figure::default());
        assert!(path.ends_with("blmm_surfplot_figure.html"));
    }
}
