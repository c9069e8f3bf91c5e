//! This module defines the [`ResourceType`] enum, the caller-facing tag describing which kind of
//! map asset a request is for. The fetch pipeline never branches on it; it travels with requests
//! so callers (request transformers, loggers, caches) can tell a style from a glyph range.
//!
//! # Examples
//!
//! ```
//! use mapfetch_core::ResourceType;
//!
//! assert_eq!(ResourceType::SpriteJSON.as_str(), "SpriteJSON");
//! assert_eq!("Tile".parse::<ResourceType>().unwrap(), ResourceType::Tile);
//! ```

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// The closed set of resource kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
	#[default]
	Unknown,
	Style,
	Source,
	Tile,
	Glyphs,
	SpriteImage,
	#[serde(rename = "SpriteJSON")]
	SpriteJSON,
	Image,
}

impl ResourceType {
	/// All resource types, in declaration order.
	pub const ALL: [ResourceType; 8] = [
		ResourceType::Unknown,
		ResourceType::Style,
		ResourceType::Source,
		ResourceType::Tile,
		ResourceType::Glyphs,
		ResourceType::SpriteImage,
		ResourceType::SpriteJSON,
		ResourceType::Image,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			ResourceType::Unknown => "Unknown",
			ResourceType::Style => "Style",
			ResourceType::Source => "Source",
			ResourceType::Tile => "Tile",
			ResourceType::Glyphs => "Glyphs",
			ResourceType::SpriteImage => "SpriteImage",
			ResourceType::SpriteJSON => "SpriteJSON",
			ResourceType::Image => "Image",
		}
	}
}

impl Display for ResourceType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ResourceType {
	type Err = anyhow::Error;

	fn from_str(value: &str) -> Result<Self> {
		match ResourceType::ALL.iter().find(|t| t.as_str() == value.trim()) {
			Some(t) => Ok(*t),
			None => bail!(
				"Unknown resource type '{value}'. Expected one of: {}",
				ResourceType::ALL.map(|t| t.as_str()).join(", ")
			),
		}
	}
}
