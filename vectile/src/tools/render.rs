use anyhow::{Context, Result};
use std::path::PathBuf;
use vectile_pipeline::{render_tile, ColumnCache, PoolCache, TileCoord, TileFormat, TilesetConfig};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// zoom/x/y of the tile to render, e.g. "10/551/341"
	#[arg(required = true, verbatim_doc_comment)]
	coord: String,

	/// path to the tileset configuration (YAML or JSON)
	#[arg(long, short, required = true)]
	config: PathBuf,

	/// output format: geojson, topojson, or mvt
	#[arg(long, short, default_value = "mvt")]
	format: String,

	/// write the rendered tile to this file instead of stdout
	#[arg(long, short)]
	output: Option<PathBuf>,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let coord = parse_coord(&arguments.coord)?;
	let format = parse_format(&arguments.format)?;
	log::debug!("render {coord:?} using config {:?}", arguments.config);

	let tileset = TilesetConfig::from_file(&arguments.config)
		.with_context(|| format!("failed to load tileset config from {:?}", arguments.config))?;

	let pools = PoolCache::new();
	let cache = ColumnCache::default();
	let response = render_tile(&pools, &cache, &tileset.layers, coord, |_layers| Ok(()), format)?;
	log::debug!("render {coord:?}: {} bytes", response.bytes.len());

	match &arguments.output {
		Some(path) => std::fs::write(path, &response.bytes).with_context(|| format!("failed to write {path:?}"))?,
		None => {
			use std::io::Write;
			std::io::stdout().write_all(&response.bytes)?;
		}
	}

	Ok(())
}

fn parse_coord(s: &str) -> Result<TileCoord> {
	let parts: Vec<&str> = s.split('/').collect();
	anyhow::ensure!(parts.len() == 3, "coord must be \"z/x/y\", got {s:?}");
	let z: u8 = parts[0].parse().with_context(|| format!("invalid zoom in {s:?}"))?;
	let x: u32 = parts[1].parse().with_context(|| format!("invalid x in {s:?}"))?;
	let y: u32 = parts[2].parse().with_context(|| format!("invalid y in {s:?}"))?;
	TileCoord::new(z, x, y)
}

fn parse_format(s: &str) -> Result<TileFormat> {
	match s {
		"geojson" | "json" => Ok(TileFormat::GeoJson),
		"topojson" => Ok(TileFormat::TopoJson),
		"mvt" | "pbf" => Ok(TileFormat::Mvt),
		_ => anyhow::bail!("unrecognized format {s:?}, expected geojson, topojson, or mvt"),
	}
}
