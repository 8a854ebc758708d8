//! blmm-surfplot -- command line front end for plotting BLMM results on brain surfaces.
//!
//! Examples:
//!
//! ```text
//! blmm-surfplot path foo left beta
//! blmm-surfplot plot --data demo/results_lh_foo/blmm_vox_beta.dat --geom lh.pial --volume 0
//! RUST_LOG=debug blmm-surfplot plot --data lh.dat rh.dat --geom lh.pial rh.pial --output both.html --no-open
//! ```

use clap::{Parser, Subcommand};
use log::{error, info};

use std::fs;
use std::path::PathBuf;
use std::process;

use blmm_surfplot::{display, result_file, surface_figure, DataType, PlotOptions, Result};

#[derive(Parser, Debug)]
#[command(
    name = "blmm-surfplot",
    about = "Interactive brain surface plots of BLMM per-vertex results",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Plot data files on their surfaces with a shared color scale.
    Plot {
        /// Raw per-vertex data files (.dat), one per surface.
        #[arg(long, num_args = 1.., required = true)]
        data: Vec<PathBuf>,

        /// FreeSurfer surface files, in the same order as the data files.
        #[arg(long, num_args = 1.., required = true)]
        geom: Vec<PathBuf>,

        /// Data column (volume) to show.
        #[arg(long, default_value_t = 0)]
        volume: usize,

        /// Element type of the data files, f32 or i32.
        #[arg(long, default_value = "f32")]
        dtype: DataType,

        /// Write the HTML page here instead of the temp directory.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also write the plotly figure JSON to this file.
        #[arg(long)]
        json: Option<PathBuf>,

        /// Do not open the page in a browser.
        #[arg(long)]
        no_open: bool,
    },
    /// Print the path of a result file, following the BLMM naming convention.
    Path {
        analysis: String,
        /// 'left' or 'right'
        hemisphere: String,
        /// Result image, like 'beta' or 'mask'.
        image: String,
    },
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Cmd::Plot {
            data,
            geom,
            volume,
            dtype,
            output,
            json,
            no_open,
        } => {
            let options = PlotOptions { volume, dtype };
            let fig = surface_figure(&data[..], &geom[..], &options)?;

            if let Some(json_path) = json {
                fs::write(&json_path, fig.to_json()?)?;
                info!("Wrote figure JSON to '{}'.", json_path.display());
            }

            match (output, no_open) {
                (None, false) => {
                    display::show(&fig)?;
                }
                (output, _) => {
                    let path = output.unwrap_or_else(|| display::html_path_for(&fig));
                    fig.write_html(&path)?;
                    info!("Wrote figure to '{}'.", path.display());
                    if !no_open {
                        display::open_or_warn(&path);
                    }
                }
            }
        }
        Cmd::Path {
            analysis,
            hemisphere,
            image,
        } => {
            println!("{}", result_file(&analysis, &hemisphere, &image)?.display());
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Args::parse()) {
        error!("{}", err);
        process::exit(1);
    }
}
