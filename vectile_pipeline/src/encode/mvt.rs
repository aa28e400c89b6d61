//! MVT encoder/decoder (§4.7).
//!
//! The PBF framing, command/zig-zag-delta geometry encoding, and tag-id dictionary are
//! already implemented by [`vectile_geometry::vector_tile`]; this module's job is
//! building one [`VectorTileLayer`] per [`FeatureLayer`] and assembling the [`VectorTile`].

use crate::feature::FeatureLayer;
use anyhow::{Context, Result};
use log::trace;
use vectile_core::Blob;
use vectile_geometry::vector_tile::{VectorTile, VectorTileLayer};

/// Default MVT tile extent in tile-local units (§4.7, de-facto 4096).
pub const DEFAULT_EXTENT: u32 = 4096;
const MVT_VERSION: u32 = 2;

/// Encodes `layers` as a single protobuf-framed MVT tile blob.
pub fn encode(layers: &[FeatureLayer], extent: u32) -> Result<Vec<u8>> {
	trace!("encoding {} layers as MVT at extent {extent}", layers.len());
	let mut tile_layers = Vec::with_capacity(layers.len());
	for layer in layers {
		let wire_features = layer.features.iter().cloned().map(|f| f.into_wire_feature()).collect();
		let tile_layer = VectorTileLayer::from_features(layer.name.clone(), wire_features, extent, MVT_VERSION)
			.with_context(|| format!("failed to encode layer '{}' as MVT", layer.name))?;
		tile_layers.push(tile_layer);
	}
	let tile = VectorTile::new(tile_layers);
	let blob = tile.to_blob().context("failed to serialize MVT tile")?;
	Ok(blob.into_vec())
}

/// Decodes a protobuf-framed MVT tile blob, returning one [`FeatureLayer`] per tile layer.
pub fn decode(bytes: &[u8]) -> Result<Vec<FeatureLayer>> {
	let blob = Blob::from(bytes.to_vec());
	let tile = VectorTile::from_blob(&blob).context("failed to parse MVT tile")?;
	let mut out = Vec::with_capacity(tile.layers.len());
	for layer in tile.layers {
		let name = layer.name.clone();
		let geo_features = layer.to_features().with_context(|| format!("failed to decode layer '{name}'"))?;
		let features = geo_features
			.into_iter()
			.map(|gf| {
				let mut f = crate::feature::Feature::new(gf.geometry);
				f.properties = gf.properties;
				f.fid = gf.id.and_then(|id| i64::try_from(id).ok());
				f
			})
			.collect();
		out.push(FeatureLayer::new(name, features));
	}
	Ok(out)
}
