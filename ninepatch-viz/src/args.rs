use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Render a texture as a sliced panel and write it as PNG.
    Render {
        /// Source texture (PNG or any format the image crate reads).
        input: PathBuf,
        /// Output image path.
        output: PathBuf,
        /// Output width in pixels.
        width: u32,
        /// Output height in pixels.
        height: u32,
        #[command(flatten)]
        panel: PanelArgs,
    },

    /// Print the sampling coordinate and color for one UV.
    ///
    /// Example: `probe button.png 0.1,0.5 --border 4,4,4,4`
    Probe {
        /// Source texture.
        input: PathBuf,
        /// Interpolated coordinate as `u,v`.
        #[arg(value_parser = parse_pair, allow_hyphen_values = true)]
        uv: [f32; 2],
        /// Panel width, for window-relative slicing.
        #[arg(long)]
        width: Option<u32>,
        /// Panel height, for window-relative slicing.
        #[arg(long)]
        height: Option<u32>,
        #[command(flatten)]
        panel: PanelArgs,
    },
}

/// Slicing options shared by every command. Unset flags fall back to the
/// `--config` file, then to defaults.
#[derive(Args, Debug, Default, PartialEq)]
pub struct PanelArgs {
    /// Border in pixels as `left,top,right,bottom`.
    #[arg(long, value_parser = parse_quad, allow_hyphen_values = true)]
    pub border: Option<[f32; 4]>,

    /// Interior repeats as `x,y`; 0 disables tiling on that axis.
    #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
    pub tiling: Option<[f32; 2]>,

    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Tint as `r,g,b,a` in [0,1].
    #[arg(long, value_parser = parse_quad)]
    pub tint: Option<[f32; 4]>,

    #[arg(long, value_enum)]
    pub filter: Option<FilterArg>,

    #[arg(long, value_enum)]
    pub address: Option<AddressArg>,

    /// Atlas sub-rect in texels as `x,y,width,height`.
    #[arg(long, value_parser = parse_rect)]
    pub atlas_rect: Option<[u32; 4]>,

    /// Gate y-axis tiling on the x factor, matching older renderers.
    #[arg(long)]
    pub legacy_tiling_guard: bool,

    /// JSON panel configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyArg {
    /// Breakpoints from pixel borders and the texture size.
    #[value(name = "self")]
    #[serde(rename = "self")]
    SelfRelative,
    /// Breakpoints from the panel size, keeping borders at native scale.
    #[value(name = "window")]
    #[serde(rename = "window")]
    WindowRelative,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeArg {
    Textured,
    Solid,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterArg {
    Nearest,
    Linear,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressArg {
    Clamp,
    Repeat,
    Mirror,
}

fn parse_values<T, const N: usize>(s: &str) -> Result<[T; N], String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<T>().map_err(|e| format!("{:?}: {}", v, e)))
        .collect::<Result<Vec<_>, _>>()?;
    values
        .try_into()
        .map_err(|v: Vec<T>| format!("expected {} comma-separated numbers, got {}", N, v.len()))
}

fn parse_pair(s: &str) -> Result<[f32; 2], String> {
    parse_values(s)
}

fn parse_quad(s: &str) -> Result<[f32; 4], String> {
    parse_values(s)
}

fn parse_rect(s: &str) -> Result<[u32; 4], String> {
    parse_values(s)
}
