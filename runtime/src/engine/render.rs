//! Markup for the bar and the spinner.

use crate::engine::position::{bar_offset, Positioning};
use crate::host::{Node, Selector};
use crate::settings::{Direction, Settings};

/// Reserved id of the bar container.
pub const CONTAINER_ID: &str = "toploader";
/// Role marker of the bar inside the container.
pub const BAR_ROLE: &str = "bar";
/// Reserved id of the spinner.
pub const SPINNER_ID: &str = "toploader-spinner";

pub const CONTAINER: Selector<'static> = Selector::Id(CONTAINER_ID);
pub const BAR: Selector<'static> = Selector::Role {
    within: CONTAINER_ID,
    role: BAR_ROLE,
};
pub const SPINNER: Selector<'static> = Selector::Id(SPINNER_ID);

/// Container with the bar placed at `value` without animation.
pub fn bar(settings: &Settings, value: f64, positioning: Positioning) -> Node {
    let (property, position) = positioning.declaration(bar_offset(value, settings.dir));
    let mut bar = Node::new("div")
        .with_role(BAR_ROLE)
        .with_style("background", settings.color.as_str())
        .with_style("height", settings.height.to_string())
        .with_style("width", "100%")
        .with_style("position", "fixed")
        .with_style("top", "0")
        .with_style("left", "0")
        .with_style("z-index", settings.z_index.to_string())
        .with_style("transition", "all 0ms linear")
        .with_style(property, position);
    if let Some(shadow) = &settings.box_shadow {
        bar = bar.with_style("box-shadow", shadow.as_str());
    }
    Node::new("div")
        .with_id(CONTAINER_ID)
        .with_style("pointer-events", "none")
        .with_child(bar)
}

/// Spinning ring in the top corner opposite to where the bar starts.
pub fn spinner(settings: &Settings) -> Node {
    let side = match settings.dir {
        Direction::Ltr => "right",
        Direction::Rtl => "left",
    };
    Node::new("div")
        .with_id(SPINNER_ID)
        .with_style("display", "block")
        .with_style("position", "fixed")
        .with_style("top", "15px")
        .with_style(side, "15px")
        .with_style("width", "18px")
        .with_style("height", "18px")
        .with_style("box-sizing", "border-box")
        .with_style("border", "solid 2px transparent")
        .with_style("border-top-color", settings.color.as_str())
        .with_style("border-left-color", settings.color.as_str())
        .with_style("border-radius", "50%")
        .with_style("z-index", settings.z_index.to_string())
        .with_style("pointer-events", "none")
        .with_style("animation", "toploader-spinner 400ms linear infinite")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Height;

    #[test]
    fn test_bar_markup_carries_settings() {
        let settings = Settings {
            color: "linear-gradient(to right, #f00, #00f)".into(),
            height: Height::Css("3px".into()),
            box_shadow: Some("0 0 10px #59a2ff".into()),
            ..Settings::default()
        };
        let node = bar(&settings, 0.0, Positioning::Translate3d);
        assert_eq!(node.id.as_deref(), Some(CONTAINER_ID));
        let inner = &node.children[0];
        assert_eq!(inner.role.as_deref(), Some(BAR_ROLE));
        assert_eq!(inner.style("background"), Some("linear-gradient(to right, #f00, #00f)"));
        assert_eq!(inner.style("height"), Some("3px"));
        assert_eq!(inner.style("z-index"), Some("2147483647"));
        assert_eq!(inner.style("transform"), Some("translate3d(-100%,0,0)"));
        assert_eq!(inner.style("box-shadow"), Some("0 0 10px #59a2ff"));
    }

    #[test]
    fn test_spinner_side_follows_direction() {
        let ltr = spinner(&Settings::default());
        assert_eq!(ltr.style("right"), Some("15px"));
        let rtl = spinner(&Settings {
            dir: Direction::Rtl,
            ..Settings::default()
        });
        assert_eq!(rtl.style("left"), Some("15px"));
        assert_eq!(rtl.style("right"), None);
    }
}
