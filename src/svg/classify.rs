//! Icon-vs-picture classification.
//!
//! An SVG qualifies as a recolorable icon when its paint is either
//! `currentColor` or at most one literal color that is not a `url(...)`
//! gradient/pattern reference. Everything else stays a static picture.
//!
//! The rules are an ordered list evaluated top to bottom; each arm returns
//! immediately, so there is exactly one outcome per input.

use crate::core::{AssetKind, Classification, ClassifyError, IngestError};
use crate::datauri::{DataUri, mime};

use super::colors::{ColorSet, extract_colors};
use super::rewrite::rewrite_icon;

/// Classify a data URI, honoring an optional caller-requested kind.
///
/// Picture outcomes always carry `data_uri` byte-identical to the input;
/// icon outcomes carry the rewritten (text-sized, color-cleared) document.
/// Policy violations surface as [`ClassifyError`]: anticipated user errors,
/// not crashes.
pub fn classify(
    data_uri: &str,
    requested: Option<AssetKind>,
) -> Result<Classification, IngestError> {
    // Rule 1: an explicit picture request is accepted unconditionally.
    if requested == Some(AssetKind::Picture) {
        return Ok(picture(data_uri));
    }

    let uri = DataUri::parse(data_uri)?;

    // Rule 2: non-SVG content can never become an icon.
    if !uri.is_svg() {
        return match requested {
            Some(AssetKind::Icon) => Err(ClassifyError::NotSvg.into()),
            _ => Ok(picture(data_uri)),
        };
    }

    let xml = uri.text()?;
    let colors = extract_colors(xml)?;

    // Rule 3: multi-colored or gradient-painted SVGs stay pictures; a caller
    // that insisted on an icon gets told why not.
    if !icon_eligible(&colors) {
        return match requested {
            Some(AssetKind::Icon) => Err(ClassifyError::NotSingleColor.into()),
            _ => Ok(picture(data_uri)),
        };
    }

    // Rule 4: icon. Resize to text-relative units; when the document uses one
    // concrete color (and no currentColor), clear it so the icon inherits the
    // surrounding text color at render time.
    let icon_color = if colors.has_current_color() {
        None
    } else {
        colors.single_literal().map(str::to_owned)
    };
    let rewritten = rewrite_icon(xml, icon_color.as_deref())?;

    Ok(Classification {
        data_uri: DataUri::from_bytes(mime::SVG, rewritten.into_bytes()).to_string(),
        kind: AssetKind::Icon,
        icon_color,
    })
}

/// Whether the color usage allows recoloring.
pub fn icon_eligible(colors: &ColorSet) -> bool {
    if colors.has_current_color() {
        return true;
    }
    if colors.literal_count() > 1 {
        return false;
    }
    // Zero colors, or one color that is not a gradient/pattern reference
    colors
        .single_literal()
        .is_none_or(|color| !color.trim_start().to_ascii_lowercase().starts_with("url("))
}

fn picture(data_uri: &str) -> Classification {
    Classification {
        data_uri: data_uri.to_string(),
        kind: AssetKind::Picture,
        icon_color: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svg_uri(xml: &str) -> String {
        DataUri::from_bytes(mime::SVG, xml.as_bytes().to_vec()).to_string()
    }

    #[test]
    fn test_current_color_only_is_icon_without_color() {
        let uri = svg_uri(r#"<svg><path fill="currentColor"/><path fill="currentColor"/></svg>"#);
        let result = classify(&uri, None).unwrap();
        assert_eq!(result.kind, AssetKind::Icon);
        assert_eq!(result.icon_color, None);

        // Color content must be untouched
        let out = DataUri::parse(&result.data_uri).unwrap();
        assert_eq!(
            out.text().unwrap().matches("currentColor").count(),
            2,
            "currentColor paints must survive the rewrite"
        );
    }

    #[test]
    fn test_single_literal_color_is_icon_with_color_cleared() {
        let uri = svg_uri(r##"<svg><path fill="#FF0000"/><rect fill="#FF0000"/></svg>"##);
        let result = classify(&uri, None).unwrap();
        assert_eq!(result.kind, AssetKind::Icon);
        assert_eq!(result.icon_color.as_deref(), Some("#FF0000"));

        let out = DataUri::parse(&result.data_uri).unwrap();
        assert!(!out.text().unwrap().contains("#FF0000"));
    }

    #[test]
    fn test_two_colors_without_request_is_picture_with_original_uri() {
        let uri = svg_uri(r##"<svg><path fill="#111111"/><path fill="#222222"/></svg>"##);
        let result = classify(&uri, None).unwrap();
        assert_eq!(result.kind, AssetKind::Picture);
        assert_eq!(result.data_uri, uri, "picture keeps the byte-identical URI");
        assert_eq!(result.icon_color, None);
    }

    #[test]
    fn test_two_colors_with_icon_request_is_policy_error() {
        let uri = svg_uri(r##"<svg><path fill="#111111"/><path fill="#222222"/></svg>"##);
        let err = classify(&uri, Some(AssetKind::Icon)).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Policy(ClassifyError::NotSingleColor)
        ));
    }

    #[test]
    fn test_gradient_reference_is_not_an_icon() {
        let uri = svg_uri(r#"<svg><path fill="url(#grad)"/></svg>"#);
        let result = classify(&uri, None).unwrap();
        assert_eq!(result.kind, AssetKind::Picture);
        assert_eq!(result.data_uri, uri);
    }

    #[test]
    fn test_colorless_svg_with_icon_request_is_icon() {
        let uri = svg_uri(r#"<svg viewBox="0 0 24 24"><path d="M0 0"/></svg>"#);
        let result = classify(&uri, Some(AssetKind::Icon)).unwrap();
        assert_eq!(result.kind, AssetKind::Icon);
        assert_eq!(result.icon_color, None);
    }

    #[test]
    fn test_non_svg_without_request_defaults_to_picture() {
        let uri = DataUri::from_bytes(mime::PNG, vec![1, 2, 3]).to_string();
        let result = classify(&uri, None).unwrap();
        assert_eq!(result.kind, AssetKind::Picture);
        assert_eq!(result.data_uri, uri);
    }

    #[test]
    fn test_non_svg_with_icon_request_is_policy_error() {
        let uri = DataUri::from_bytes(mime::PNG, vec![1, 2, 3]).to_string();
        let err = classify(&uri, Some(AssetKind::Icon)).unwrap_err();
        assert!(matches!(err, IngestError::Policy(ClassifyError::NotSvg)));
    }

    #[test]
    fn test_explicit_picture_request_skips_validation() {
        // Not even a data URI - rule 1 accepts before parsing
        let result = classify("https://cdn.example/pic.png", Some(AssetKind::Picture)).unwrap();
        assert_eq!(result.kind, AssetKind::Picture);
        assert_eq!(result.data_uri, "https://cdn.example/pic.png");
    }

    #[test]
    fn test_mixed_current_color_and_literals_is_icon() {
        let uri = svg_uri(r##"<svg><path fill="currentColor"/><path fill="#111"/><path fill="#222"/></svg>"##);
        let result = classify(&uri, None).unwrap();
        assert_eq!(result.kind, AssetKind::Icon);
        // More than one literal: nothing is stripped, no single color reported
        assert_eq!(result.icon_color, None);
    }
}
