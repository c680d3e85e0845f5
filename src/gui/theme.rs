use eframe::egui::{
    self,
    epaint::Shadow,
    style::{
        Selection,
        WidgetVisuals,
        Widgets,
    },
    Color32,
    RichText,
    Stroke,
    Visuals,
};

/// Dark and light palettes registered with egui; the active one follows the
/// context's theme.
#[derive(Clone)]
pub struct Theme {
    dark: ThemeDetails,
    light: ThemeDetails,
}

impl Default for Theme {
    fn default() -> Self {
        Self::manuscript()
    }
}

impl Theme {
    pub fn manuscript() -> Self {
        Theme { dark: ThemeDetails::ink(), light: ThemeDetails::paper() }
    }

    fn details(&self, ctx: &egui::Context) -> &ThemeDetails {
        if ctx.style().visuals.dark_mode {
            &self.dark
        } else {
            &self.light
        }
    }

    pub fn heading(&self, ctx: &egui::Context, content: &str) -> RichText {
        RichText::new(content).color(self.details(ctx).accent).strong()
    }

    pub fn accent(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).accent
    }

    pub fn muted(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).muted
    }

    pub fn red(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).red
    }

    pub fn amber(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).amber
    }

    pub fn green(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).green
    }

    /// Fill for a progress bar, shading from accent towards green as it fills.
    pub fn progress_fill(&self, ctx: &egui::Context, fraction: f32) -> Color32 {
        let details = self.details(ctx);
        blend_colors(details.accent, details.green, fraction.clamp(0.0, 1.0))
    }
}

#[derive(Clone)]
pub struct ThemeDetails {
    background: Color32,
    foreground: Color32,
    selection: Color32,
    muted: Color32,
    red: Color32,
    amber: Color32,
    green: Color32,
    accent: Color32,
    link: Color32,
    background_darker: Color32,
    background_dark: Color32,
    background_light: Color32,
    background_lighter: Color32,
}

impl ThemeDetails {
    fn ink() -> Self {
        Self {
            background: Color32::from_rgb(30, 32, 40),
            foreground: Color32::from_rgb(226, 222, 212),
            selection: Color32::from_rgb(62, 66, 84),
            muted: Color32::from_rgb(128, 134, 156),
            red: Color32::from_rgb(232, 106, 106),
            amber: Color32::from_rgb(230, 176, 92),
            green: Color32::from_rgb(122, 196, 132),
            accent: Color32::from_rgb(176, 150, 236),
            link: Color32::from_rgb(120, 182, 232),
            background_darker: Color32::from_rgb(20, 21, 27),
            background_dark: Color32::from_rgb(25, 27, 34),
            background_light: Color32::from_rgb(44, 47, 58),
            background_lighter: Color32::from_rgb(58, 61, 74),
        }
    }

    fn paper() -> Self {
        Self {
            background: Color32::from_rgb(250, 247, 240),
            foreground: Color32::from_rgb(48, 44, 40),
            selection: Color32::from_rgb(222, 212, 238),
            muted: Color32::from_rgb(136, 128, 118),
            red: Color32::from_rgb(190, 70, 64),
            amber: Color32::from_rgb(196, 130, 40),
            green: Color32::from_rgb(72, 150, 88),
            accent: Color32::from_rgb(118, 86, 184),
            link: Color32::from_rgb(52, 120, 180),
            background_darker: Color32::from_rgb(232, 226, 214),
            background_dark: Color32::from_rgb(241, 236, 226),
            background_light: Color32::from_rgb(253, 251, 246),
            background_lighter: Color32::from_rgb(255, 255, 255),
        }
    }
}

pub fn set_theme(ctx: &egui::Context, theme: &Theme) {
    set_theme_variant(ctx, &theme.dark, true);
    set_theme_variant(ctx, &theme.light, false);
}

pub fn blend_colors(color_a: Color32, color_b: Color32, t: f32) -> Color32 {
    let blend_channel = |a: u8, b: u8| ((1.0 - t) * (a as f32) + t * (b as f32)).round() as u8;
    Color32::from_rgba_unmultiplied(
        blend_channel(color_a.r(), color_b.r()),
        blend_channel(color_a.g(), color_b.g()),
        blend_channel(color_a.b(), color_b.b()),
        blend_channel(color_a.a(), color_b.a()),
    )
}

fn widget(
    base: WidgetVisuals,
    bg_fill: Color32,
    weak_bg_fill: Color32,
    border: Color32,
    text: Color32,
) -> WidgetVisuals {
    WidgetVisuals {
        bg_fill,
        weak_bg_fill,
        bg_stroke: Stroke { color: border, ..base.bg_stroke },
        fg_stroke: Stroke { color: text, ..base.fg_stroke },
        ..base
    }
}

fn set_theme_variant(ctx: &egui::Context, theme: &ThemeDetails, is_dark: bool) {
    let (default, variant) = match is_dark {
        true => (Visuals::dark(), egui::Theme::Dark),
        false => (Visuals::light(), egui::Theme::Light),
    };
    let w = &default.widgets;

    ctx.set_visuals_of(
        variant,
        Visuals {
            dark_mode: is_dark,
            widgets: Widgets {
                noninteractive: widget(
                    w.noninteractive,
                    theme.background,
                    theme.background_light,
                    theme.background_darker,
                    theme.foreground,
                ),
                inactive: widget(
                    w.inactive,
                    theme.background_light,
                    theme.background_lighter,
                    theme.background_darker,
                    theme.foreground,
                ),
                hovered: widget(
                    w.hovered,
                    theme.selection,
                    theme.background_lighter,
                    theme.accent,
                    theme.foreground,
                ),
                active: widget(
                    w.active,
                    theme.selection,
                    theme.background_light,
                    theme.accent,
                    theme.foreground,
                ),
                open: widget(
                    w.open,
                    theme.background_dark,
                    theme.background_lighter,
                    theme.accent,
                    theme.foreground,
                ),
            },
            selection: Selection {
                bg_fill: theme.selection,
                stroke: Stroke { color: theme.foreground, ..default.selection.stroke },
            },
            hyperlink_color: theme.link,
            faint_bg_color: match is_dark {
                true => theme.background_darker,
                false => theme.background_dark,
            },
            extreme_bg_color: match is_dark {
                true => theme.background_darker,
                false => theme.background_lighter,
            },
            code_bg_color: theme.background_dark,
            error_fg_color: theme.red,
            warn_fg_color: theme.amber,
            window_shadow: Shadow { color: theme.background_darker, ..default.window_shadow },
            window_fill: theme.background,
            window_stroke: Stroke { color: theme.background_light, ..default.window_stroke },
            panel_fill: theme.background_dark,
            popup_shadow: Shadow { color: theme.background_dark, ..default.popup_shadow },
            collapsing_header_frame: true,
            ..default
        },
    );

    ctx.all_styles_mut(|style| {
        style.interaction.tooltip_delay = 0.2;
        style.spacing.item_spacing.y = 6.0;
    });
}
