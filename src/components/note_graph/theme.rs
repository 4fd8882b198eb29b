//! Theme palettes for the canvas renderer.
//!
//! A theme is a pure mapping to colors. Switching it only changes what the
//! next frame paints; simulation state (positions, velocities, pins) is
//! untouched.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
	Light,
	#[default]
	Dark,
}

/// Canvas-ready CSS color strings for one theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeColors {
	pub background: &'static str,
	pub node_default: &'static str,
	pub node_selected: &'static str,
	pub node_selected_glow: &'static str,
	pub node_highlight: &'static str,
	pub link: &'static str,
	pub text: &'static str,
	pub text_halo: &'static str,
}

impl Theme {
	pub fn from_dark_flag(dark: bool) -> Self {
		if dark { Theme::Dark } else { Theme::Light }
	}

	pub fn colors(self) -> ThemeColors {
		match self {
			Theme::Dark => ThemeColors {
				background: "#0f172a",
				node_default: "#3b82f6",
				node_selected: "#f59e0b",
				node_selected_glow: "#fbbf24",
				node_highlight: "#ffffff",
				link: "#64748b",
				text: "#f1f5f9",
				text_halo: "#000000",
			},
			Theme::Light => ThemeColors {
				background: "#f8fafc",
				node_default: "#1e40af",
				node_selected: "#d97706",
				node_selected_glow: "#f59e0b",
				node_highlight: "#ffffff",
				link: "#94a3b8",
				text: "#1e293b",
				text_halo: "#ffffff",
			},
		}
	}
}
