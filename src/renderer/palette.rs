//! Colors per theme

/// CSS colors the renderer paints with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub food: &'static str,
    pub special_food: &'static str,
    pub obstacle: &'static str,
    pub snake_head: &'static str,
    pub snake_body: &'static str,
    pub bot_head: &'static str,
    pub bot_body: &'static str,
}

impl Palette {
    /// Palette for a theme id; unknown ids get the light theme
    pub fn for_theme(theme: &str) -> Self {
        let base = Self::light();
        match theme {
            "dark" => Self {
                background: "#1a1a1a",
                food: "#ffffff",
                snake_head: "#4ade80",
                snake_body: "#22c55e",
                ..base
            },
            "ocean" => Self {
                background: "#1a1a2e",
                food: "#ffff00",
                snake_head: "#38bdf8",
                snake_body: "#0ea5e9",
                ..base
            },
            "sunset" => Self {
                background: "#2d1810",
                food: "#ff6b35",
                ..base
            },
            "forest" => Self {
                background: "#1a4d1a",
                food: "#32cd32",
                ..base
            },
            "neon" | "galaxy" => Self {
                background: "#0f0f23",
                food: "#ff0080",
                snake_head: "#a855f7",
                snake_body: "#7928ca",
                ..base
            },
            "vip" => Self {
                background: "#1a0033",
                food: "#ffd700",
                snake_head: "#ffd700",
                snake_body: "#ffed4e",
                ..base
            },
            _ => base,
        }
    }

    fn light() -> Self {
        Self {
            background: "#f8f9fa",
            food: "#ff6b6b",
            special_food: "#ffd700",
            obstacle: "#6b7280",
            snake_head: "#16a34a",
            snake_body: "#22c55e",
            bot_head: "#dc2626",
            bot_body: "#ef4444",
        }
    }
}
