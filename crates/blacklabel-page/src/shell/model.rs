use blacklabel_engine::paint::Color;
use blacklabel_markup::{Node, parse_str};

use super::ShellError;

#[derive(Debug, Clone, PartialEq)]
pub struct NavLink {
    pub label: String,
    /// In-page anchor, e.g. `#fleet`. Never followed.
    pub href: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeroCopy {
    pub eyebrow: Option<String>,
    pub title: String,
    pub subtitle: Option<String>,
    pub meta: Option<String>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CtaStyle {
    /// Filled with the accent color.
    Primary,
    /// Outline only.
    Ghost,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallToAction {
    pub label: String,
    pub style: CtaStyle,
}

/// Where the backdrop animation mounts.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BackdropSlot {
    /// Container height as a fraction of the viewport height.
    pub height_ratio: f32,
}

impl Default for BackdropSlot {
    fn default() -> Self {
        Self { height_ratio: 0.8 }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    /// Nav bar fill.
    pub chrome: Color,
    pub ink: Color,
    pub muted: Color,
    pub accent: Color,
    pub outline: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::from_hex(0x050509),
            chrome: Color::from_srgb_u8(0x05, 0x05, 0x09, 0xd9),
            ink: Color::from_hex(0xf5f5f7),
            muted: Color::from_hex(0x9a9aa6),
            accent: Color::from_hex(0xf5f5f7),
            outline: Color::from_srgb_u8(0xf5, 0xf5, 0xf7, 0x66),
        }
    }
}

/// The whole static page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageShell {
    pub brand: String,
    pub links: Vec<NavLink>,
    pub hero: HeroCopy,
    pub actions: Vec<CallToAction>,
    /// `None` renders the hero without an animation.
    pub backdrop: Option<BackdropSlot>,
    pub theme: Theme,
}

impl Default for PageShell {
    fn default() -> Self {
        let link = |label: &str, href: &str| NavLink { label: label.into(), href: href.into() };
        Self {
            brand: "EXOTIC BLACK".into(),
            links: vec![
                link("Fleet", "#fleet"),
                link("Membership", "#membership"),
                link("Locations", "#locations"),
                link("Contact", "#contact"),
            ],
            hero: HeroCopy {
                eyebrow: Some("Luxury Car Rental".into()),
                title: "Black Label".into(),
                subtitle: Some(
                    "A private fleet of hypercars, supercars, and one-of-one exotics. \
                     Reserved for clients who refuse standard rentals."
                        .into(),
                ),
                meta: Some("Los Angeles · Orange County".into()),
            },
            actions: vec![
                CallToAction { label: "Request Availability".into(), style: CtaStyle::Primary },
                CallToAction { label: "View Collection".into(), style: CtaStyle::Ghost },
            ],
            backdrop: Some(BackdropSlot::default()),
            theme: Theme::default(),
        }
    }
}

impl PageShell {
    /// Parses `.blm` source:
    ///
    /// ```text
    /// Page {
    ///     background: #050509
    ///     Header "EXOTIC BLACK" { Link "Fleet" { href: "#fleet" } }
    ///     Hero {
    ///         Backdrop { height_ratio: 0.8 }
    ///         Eyebrow "Luxury Car Rental"
    ///         Title "Black Label"
    ///         Button "Request Availability" { style: primary }
    ///     }
    /// }
    /// ```
    ///
    /// Theme colors missing from the page fall back to [`Theme::default`].
    pub fn from_markup(src: &str) -> Result<Self, ShellError> {
        let doc = parse_str(src)?;
        Self::from_node(&doc.root)
    }

    pub fn from_node(page: &Node) -> Result<Self, ShellError> {
        if page.name != "Page" {
            return Err(ShellError::UnexpectedRoot {
                found: page.name.clone(),
                line: page.line,
                col: page.col,
            });
        }

        let header = required(page, "Header")?;
        let brand = text(header)?;
        let links = header
            .children_named("Link")
            .map(|n| {
                Ok(NavLink {
                    label: text(n)?,
                    href: n.str_prop("href").unwrap_or("#").to_string(),
                })
            })
            .collect::<Result<Vec<_>, ShellError>>()?;

        let hero = required(page, "Hero")?;
        let copy = HeroCopy {
            eyebrow: optional_text(hero, "Eyebrow"),
            title: text(required(hero, "Title")?)?,
            subtitle: optional_text(hero, "Subtitle"),
            meta: optional_text(hero, "Meta"),
        };
        let actions = hero
            .children_named("Button")
            .map(call_to_action)
            .collect::<Result<Vec<_>, ShellError>>()?;
        let backdrop = hero.child("Backdrop").map(backdrop_slot).transpose()?;

        for node in page.children.iter().chain(&hero.children) {
            if !KNOWN.contains(&node.name.as_str()) {
                log::debug!("shell: ignoring `{}` at {}:{}", node.name, node.line, node.col);
            }
        }

        Ok(Self {
            brand,
            links,
            hero: copy,
            actions,
            backdrop,
            theme: theme(page),
        })
    }
}

const KNOWN: [&str; 8] =
    ["Header", "Hero", "Backdrop", "Eyebrow", "Title", "Subtitle", "Button", "Meta"];

fn required<'a>(parent: &'a Node, name: &'static str) -> Result<&'a Node, ShellError> {
    parent.child(name).ok_or_else(|| ShellError::MissingNode {
        node: name,
        parent: parent.name.clone(),
        line: parent.line,
        col: parent.col,
    })
}

fn text(node: &Node) -> Result<String, ShellError> {
    node.content.clone().ok_or_else(|| ShellError::MissingText {
        node: node.name.clone(),
        line: node.line,
        col: node.col,
    })
}

fn optional_text(parent: &Node, name: &str) -> Option<String> {
    parent.child(name).and_then(|n| n.content.clone())
}

fn call_to_action(node: &Node) -> Result<CallToAction, ShellError> {
    let style = match node.str_prop("style") {
        None | Some("primary") => CtaStyle::Primary,
        Some("ghost") => CtaStyle::Ghost,
        Some(other) => {
            return Err(ShellError::UnknownStyle {
                style: other.to_string(),
                line: node.line,
                col: node.col,
            });
        }
    };
    Ok(CallToAction { label: text(node)?, style })
}

fn backdrop_slot(node: &Node) -> Result<BackdropSlot, ShellError> {
    let Some(value) = node.number_prop("height_ratio") else {
        return Ok(BackdropSlot::default());
    };
    if !(value > 0.0 && value <= 1.0) {
        return Err(ShellError::InvalidRatio { value, line: node.line, col: node.col });
    }
    Ok(BackdropSlot { height_ratio: value })
}

fn theme(page: &Node) -> Theme {
    let color = |key: &str, fallback: Color| {
        page.color_prop(key)
            .map_or(fallback, |[r, g, b, a]| Color::from_srgb_u8(r, g, b, a))
    };
    let d = Theme::default();
    Theme {
        background: color("background", d.background),
        chrome: color("chrome", d.chrome),
        ink: color("ink", d.ink),
        muted: color("muted", d.muted),
        accent: color("accent", d.accent),
        outline: color("outline", d.outline),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LANDING: &str = r##"
        Page {
            background: #050509
            accent: #d4af37
            Header "EXOTIC BLACK" {
                Link "Fleet" { href: "#fleet" }
                Link "Membership" { href: "#membership" }
                Link "Locations" { href: "#locations" }
                Link "Contact" { href: "#contact" }
            }
            Hero {
                Backdrop { height_ratio: 0.8 }
                Eyebrow "Luxury Car Rental"
                Title "Black Label"
                Subtitle "A private fleet of hypercars, supercars, and one-of-one exotics. Reserved for clients who refuse standard rentals."
                Button "Request Availability" { style: primary }
                Button "View Collection" { style: ghost }
                Meta "Los Angeles · Orange County"
            }
        }
    "##;

    // ── markup ──

    #[test]
    fn landing_markup_matches_built_in_copy() {
        let shell = PageShell::from_markup(LANDING).unwrap();
        let builtin = PageShell::default();
        assert_eq!(shell.brand, builtin.brand);
        assert_eq!(shell.links, builtin.links);
        assert_eq!(shell.hero, builtin.hero);
        assert_eq!(shell.actions, builtin.actions);
        assert_eq!(shell.backdrop, builtin.backdrop);
    }

    #[test]
    fn page_colors_override_the_theme() {
        let shell = PageShell::from_markup(LANDING).unwrap();
        assert_eq!(shell.theme.accent, Color::from_srgb_u8(0xd4, 0xaf, 0x37, 0xff));
        assert_eq!(shell.theme.ink, Theme::default().ink);
    }

    #[test]
    fn minimal_page_has_no_backdrop_or_actions() {
        let shell =
            PageShell::from_markup(r#"Page { Header "X" Hero { Title "Y" } }"#).unwrap();
        assert!(shell.links.is_empty());
        assert!(shell.actions.is_empty());
        assert_eq!(shell.backdrop, None);
        assert_eq!(shell.hero.eyebrow, None);
    }

    #[test]
    fn link_without_href_points_at_top() {
        let shell =
            PageShell::from_markup(r#"Page { Header "X" { Link "A" } Hero { Title "Y" } }"#)
                .unwrap();
        assert_eq!(shell.links[0].href, "#");
    }

    #[test]
    fn button_defaults_to_primary() {
        let shell =
            PageShell::from_markup(r#"Page { Header "X" Hero { Title "Y" Button "Go" } }"#)
                .unwrap();
        assert_eq!(shell.actions[0].style, CtaStyle::Primary);
    }

    #[test]
    fn bare_backdrop_uses_default_ratio() {
        let shell =
            PageShell::from_markup(r#"Page { Header "X" Hero { Title "Y" Backdrop } }"#).unwrap();
        assert_eq!(shell.backdrop, Some(BackdropSlot { height_ratio: 0.8 }));
    }

    // ── errors ──

    #[test]
    fn wrong_root_is_rejected() {
        let err = PageShell::from_markup(r#"Hero { Title "Y" }"#).unwrap_err();
        assert!(matches!(err, ShellError::UnexpectedRoot { ref found, .. } if found == "Hero"));
    }

    #[test]
    fn missing_title_is_reported_on_the_hero() {
        let err = PageShell::from_markup("Page {\n  Header \"X\"\n  Hero { }\n}").unwrap_err();
        assert_eq!(
            err,
            ShellError::MissingNode { node: "Title", parent: "Hero".into(), line: 3, col: 3 }
        );
    }

    #[test]
    fn header_needs_a_brand() {
        let err = PageShell::from_markup(r#"Page { Header { } Hero { Title "Y" } }"#).unwrap_err();
        assert!(matches!(err, ShellError::MissingText { ref node, .. } if node == "Header"));
    }

    #[test]
    fn unknown_button_style_is_rejected() {
        let err = PageShell::from_markup(
            r#"Page { Header "X" Hero { Title "Y" Button "Go" { style: loud } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ShellError::UnknownStyle { ref style, .. } if style == "loud"));
    }

    #[test]
    fn out_of_range_ratio_is_rejected() {
        for ratio in ["0", "1.5", "-0.2"] {
            let src = format!(
                r#"Page {{ Header "X" Hero {{ Title "Y" Backdrop {{ height_ratio: {ratio} }} }} }}"#
            );
            let err = PageShell::from_markup(&src).unwrap_err();
            assert!(matches!(err, ShellError::InvalidRatio { .. }), "{ratio}: {err}");
        }
    }

    #[test]
    fn parse_errors_pass_through() {
        let err = PageShell::from_markup("Page {").unwrap_err();
        assert!(matches!(err, ShellError::Parse(_)));
    }
}
