use cubemap_tools::NameStyle;
use structopt::StructOpt;

/// Split a 4x3 cross cubemap into six skybox faces.
#[derive(StructOpt)]
pub struct Opts {
    /// Directory to read images from and write faces to. Defaults to the current directory.
    #[structopt(long)]
    dir: Option<std::path::PathBuf>,
    /// Keep every `.` segment of the input name instead of only the first and last.
    #[structopt(long)]
    keep_stem: bool,
    /// Cubemap images. Anything not containing `.png` or `.jpg` is ignored.
    images: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = Opts::from_args();

    let dir = match opts.dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let style = if opts.keep_stem {
        NameStyle::KeepStem
    } else {
        NameStyle::Truncate
    };

    let mut processed = false;

    for name in opts.images.iter().filter(|name| cubemap_tools::is_image_arg(name)) {
        let reports = cubemap_tools::process_image(&dir, name, style)?;

        let failed = reports.iter().filter(|report| !report.is_ok()).count();
        log::info!(
            "{}: wrote {} faces, {} failed",
            name,
            reports.len() - failed,
            failed
        );

        processed = true;
    }

    if !processed {
        log::error!("No Image");
        println!("usage: split-cubemap image-name.png");
    }

    Ok(())
}
