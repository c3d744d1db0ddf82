//! Page background composition.
//!
//! Exactly one of these paths renders, checked in order:
//!
//! - image with overlay > 0: image layer, then a black scrim; no gradient
//! - image with overlay 0: gradient (if any) layered over the image
//! - gradient without image
//! - flat background color

use crate::html::{css_url, sanitize_css_value};
use crate::style::StyleDeclaration;
use pagesmith_common::{Background, BackgroundFit, DesignTokens, Gradient, GradientKind};
use serde::{Deserialize, Serialize};
use tracing::instrument;

pub const FALLBACK_BACKGROUND_COLOR: &str = "#ffffff";

/// Resolved page background: the page layer plus an optional scrim layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBackground {
    pub declaration: StyleDeclaration,
    pub scrim: Option<StyleDeclaration>,
}

fn gradient_css(gradient: &Gradient) -> Option<String> {
    let start = sanitize_css_value(&gradient.start);
    let end = sanitize_css_value(&gradient.end);
    match gradient.kind {
        GradientKind::None => None,
        GradientKind::Linear => Some(format!(
            "linear-gradient({}deg, {}, {})",
            gradient.angle % 360,
            start,
            end
        )),
        GradientKind::Radial => Some(format!("radial-gradient(circle, {}, {})", start, end)),
    }
}

fn apply_image_fit(decl: &mut StyleDeclaration, background: &Background) {
    match background.fit {
        BackgroundFit::Cover => decl.set("background-size", "cover"),
        BackgroundFit::Contain => decl.set("background-size", "contain"),
        BackgroundFit::Fill => decl.set("background-size", "100% 100%"),
        BackgroundFit::Repeat => decl.set("background-size", "auto"),
    }
    decl.set(
        "background-repeat",
        if background.fit == BackgroundFit::Repeat {
            "repeat"
        } else {
            "no-repeat"
        },
    );
    decl.set("background-position", "center");
}

fn scrim_for(overlay: u8) -> StyleDeclaration {
    let alpha = f64::from(overlay.min(100)) / 100.0;
    let mut scrim = StyleDeclaration::new();
    scrim.set("background-color", format!("rgba(0, 0, 0, {})", alpha));
    scrim.set("inset", "0");
    scrim.set("pointer-events", "none");
    scrim.set("position", "absolute");
    scrim
}

#[instrument(skip(tokens))]
pub fn resolve_page_background(tokens: &DesignTokens) -> PageBackground {
    let background = &tokens.background;
    let mut decl = StyleDeclaration::new();

    let scrim = match background.image_url() {
        Some(image) if background.overlay > 0 => {
            decl.set("background-image", css_url(image));
            apply_image_fit(&mut decl, background);
            Some(scrim_for(background.overlay))
        }
        Some(image) => {
            let layers = match gradient_css(&tokens.gradient) {
                Some(gradient) => format!("{}, {}", gradient, css_url(image)),
                None => css_url(image),
            };
            decl.set("background-image", layers);
            apply_image_fit(&mut decl, background);
            None
        }
        None => {
            match gradient_css(&tokens.gradient) {
                Some(gradient) => decl.set("background-image", gradient),
                None => {
                    let color = sanitize_css_value(&background.color);
                    decl.set(
                        "background-color",
                        if color.is_empty() {
                            FALLBACK_BACKGROUND_COLOR.to_string()
                        } else {
                            color
                        },
                    );
                }
            }
            None
        }
    };

    PageBackground {
        declaration: decl,
        scrim,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens_with(image: Option<&str>, overlay: u8, kind: GradientKind) -> DesignTokens {
        let mut tokens = DesignTokens::default();
        tokens.background.image = image.map(str::to_string);
        tokens.background.overlay = overlay;
        tokens.gradient.kind = kind;
        tokens.gradient.angle = 135;
        tokens.gradient.start = "#ff0000".to_string();
        tokens.gradient.end = "#0000ff".to_string();
        tokens
    }

    #[test]
    fn test_overlay_suppresses_gradient() {
        let bg = resolve_page_background(&tokens_with(Some("/hero.jpg"), 40, GradientKind::Linear));

        assert_eq!(
            bg.declaration.get("background-image"),
            Some("url(\"/hero.jpg\")")
        );
        let scrim = bg.scrim.expect("scrim layer");
        assert_eq!(scrim.get("background-color"), Some("rgba(0, 0, 0, 0.4)"));
    }

    #[test]
    fn test_gradient_layers_over_image_without_overlay() {
        let linear = resolve_page_background(&tokens_with(Some("/hero.jpg"), 0, GradientKind::Linear));
        assert_eq!(
            linear.declaration.get("background-image"),
            Some("linear-gradient(135deg, #ff0000, #0000ff), url(\"/hero.jpg\")")
        );
        assert!(linear.scrim.is_none());

        let radial = resolve_page_background(&tokens_with(Some("/hero.jpg"), 0, GradientKind::Radial));
        assert_eq!(
            radial.declaration.get("background-image"),
            Some("radial-gradient(circle, #ff0000, #0000ff), url(\"/hero.jpg\")")
        );
    }

    #[test]
    fn test_gradient_alone_and_flat_color() {
        let gradient_only = resolve_page_background(&tokens_with(None, 0, GradientKind::Linear));
        assert_eq!(
            gradient_only.declaration.get("background-image"),
            Some("linear-gradient(135deg, #ff0000, #0000ff)")
        );
        assert_eq!(gradient_only.declaration.get("background-color"), None);

        let flat = resolve_page_background(&tokens_with(None, 0, GradientKind::None));
        assert_eq!(flat.declaration.get("background-color"), Some("#ffffff"));
        assert_eq!(flat.declaration.get("background-image"), None);
    }

    #[test]
    fn test_overlay_without_image_is_ignored() {
        let bg = resolve_page_background(&tokens_with(None, 80, GradientKind::None));
        assert!(bg.scrim.is_none());
    }
}
