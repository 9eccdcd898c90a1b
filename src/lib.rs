use anyhow::Context;
use image::{DynamicImage, GenericImageView, ImageBuffer, Pixel};
use std::path::{Path, PathBuf};

/// One face of a cross-layout cubemap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Left,
    Front,
    Right,
    Back,
    Down,
    Up,
}

impl Face {
    /// Processing order.
    pub const ALL: [Face; 6] = [
        Face::Left,
        Face::Front,
        Face::Right,
        Face::Back,
        Face::Down,
        Face::Up,
    ];

    /// `(column, row)` of the face in the 4x3 grid.
    pub fn cell(self) -> (u32, u32) {
        match self {
            Face::Left => (0, 1),
            Face::Front => (1, 1),
            Face::Right => (2, 1),
            Face::Back => (3, 1),
            Face::Down => (1, 2),
            Face::Up => (1, 0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Face::Left => "left",
            Face::Front => "front",
            Face::Right => "right",
            Face::Back => "back",
            Face::Down => "down",
            Face::Up => "up",
        }
    }

    pub fn suffix(self) -> String {
        format!("_{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl CellSize {
    pub fn of(image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();

        Self {
            width: width / 4,
            height: height / 3,
        }
    }
}

/// How the face suffix is spliced into the input file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameStyle {
    /// First `.` segment + suffix + last `.` segment. Middle segments are lost.
    /// Blender's export script kept the second segment instead of the last.
    #[default]
    Truncate,
    /// Everything up to the last `.` + suffix + extension.
    KeepStem,
}

/// Outcome of writing one image to disk.
#[derive(Debug)]
pub struct SaveReport {
    pub path: PathBuf,
    pub result: Result<(), image::ImageError>,
}

#[derive(Debug)]
pub struct FaceReport {
    pub face: Face,
    pub path: PathBuf,
    pub result: Result<(), image::ImageError>,
}

impl FaceReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

pub fn is_image_arg(arg: &str) -> bool {
    arg.contains(".png") || arg.contains(".jpg")
}

pub fn add_to_filename(name: &str, suffix: &str, style: NameStyle) -> String {
    let (base, extension) = match style {
        NameStyle::Truncate => match (name.split_once('.'), name.rsplit_once('.')) {
            (Some((base, _)), Some((_, extension))) => (base, extension),
            _ => return format!("{}{}", name, suffix),
        },
        NameStyle::KeepStem => match name.rsplit_once('.') {
            Some(split) => split,
            None => return format!("{}{}", name, suffix),
        },
    };

    format!("{}{}.{}", base, suffix, extension)
}

/// Splits `dir/name` into six face images written next to it.
///
/// Failing to open the input is an error. Failing to write a face is not: it
/// is logged and recorded in the returned reports, one per face in
/// [`Face::ALL`] order.
pub fn process_image(
    dir: &Path,
    name: &str,
    style: NameStyle,
) -> anyhow::Result<Vec<FaceReport>> {
    let path = dir.join(name);
    log::info!("{}", path.display());

    // Sniff the format from content so names like `sky.png.bak` still load.
    let image = image::io::Reader::open(&path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(image::ImageError::from)
        .and_then(|reader| reader.decode())
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let cell = CellSize::of(&image);

    if cell.width != cell.height {
        log::warn!(
            "Cells are {}x{}, faces will be cropped to {}x{}",
            cell.width,
            cell.height,
            cell.width,
            cell.width
        );
    }

    Ok(Face::ALL
        .iter()
        .map(|&face| {
            let (column, row) = face.cell();

            let SaveReport { path, result } = split_and_save(
                &image,
                dir,
                column * cell.width,
                row * cell.height,
                cell.width,
                &add_to_filename(name, &face.suffix(), style),
            );

            FaceReport { face, path, result }
        })
        .collect())
}

/// Crops a `size` x `size` square at (`start_x`, `start_y`) and saves it.
pub fn split_and_save(
    image: &DynamicImage,
    dir: &Path,
    start_x: u32,
    start_y: u32,
    size: u32,
    output_name: &str,
) -> SaveReport {
    save_image(&crop_square(image, start_x, start_y, size), dir, output_name)
}

pub fn save_image(image: &DynamicImage, dir: &Path, output_name: &str) -> SaveReport {
    let path = dir.join(output_name);

    let result = image.save(&path);

    if let Err(error) = &result {
        log::error!(
            "Could not convert image. {}: {}",
            path.display(),
            error
        );
    }

    SaveReport { path, result }
}

fn crop_square(image: &DynamicImage, start_x: u32, start_y: u32, size: u32) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(buffer) => {
            DynamicImage::ImageLuma8(pad_crop(buffer, start_x, start_y, size))
        }
        DynamicImage::ImageLumaA8(buffer) => {
            DynamicImage::ImageLumaA8(pad_crop(buffer, start_x, start_y, size))
        }
        DynamicImage::ImageRgb8(buffer) => {
            DynamicImage::ImageRgb8(pad_crop(buffer, start_x, start_y, size))
        }
        DynamicImage::ImageRgba8(buffer) => {
            DynamicImage::ImageRgba8(pad_crop(buffer, start_x, start_y, size))
        }
        DynamicImage::ImageLuma16(buffer) => {
            DynamicImage::ImageLuma16(pad_crop(buffer, start_x, start_y, size))
        }
        DynamicImage::ImageLumaA16(buffer) => {
            DynamicImage::ImageLumaA16(pad_crop(buffer, start_x, start_y, size))
        }
        DynamicImage::ImageRgb16(buffer) => {
            DynamicImage::ImageRgb16(pad_crop(buffer, start_x, start_y, size))
        }
        DynamicImage::ImageRgba16(buffer) => {
            DynamicImage::ImageRgba16(pad_crop(buffer, start_x, start_y, size))
        }
        DynamicImage::ImageRgb32F(buffer) => {
            DynamicImage::ImageRgb32F(pad_crop(buffer, start_x, start_y, size))
        }
        DynamicImage::ImageRgba32F(buffer) => {
            DynamicImage::ImageRgba32F(pad_crop(buffer, start_x, start_y, size))
        }
        _ => DynamicImage::ImageRgba8(pad_crop(&image.to_rgba8(), start_x, start_y, size)),
    }
}

// `crop_imm` clamps to the source bounds; whatever it cut off stays zeroed.
fn pad_crop<P: Pixel>(
    buffer: &ImageBuffer<P, Vec<P::Subpixel>>,
    start_x: u32,
    start_y: u32,
    size: u32,
) -> ImageBuffer<P, Vec<P::Subpixel>> {
    let cropped = image::imageops::crop_imm(buffer, start_x, start_y, size, size);

    let mut padded = ImageBuffer::new(size, size);
    image::imageops::replace(&mut padded, &*cropped, 0, 0);
    padded
}
