//! Coordinate extraction from the game's embedded map widget
//!
//! The widget is a Google Maps embed iframe. Its `src` carries the current
//! panorama location either as a `location=lat,lng` query parameter or as an
//! `@lat,lng` path segment.

use reqwest::Url;
use tracing::debug;

use crate::models::GeoPoint;

const EMBED_MARKERS: [&str; 2] = ["google.com/maps/embed", "maps.google.com"];

/// Whether an iframe `src` belongs to the map widget
#[must_use]
pub fn is_map_embed(src: &str) -> bool {
    EMBED_MARKERS.iter().any(|marker| src.contains(marker))
}

/// Recover the displayed location from a map embed address.
///
/// Returns `None` when neither form is present or the numbers are not valid
/// degrees.
#[must_use]
pub fn extract_coordinates(embed_url: &str) -> Option<GeoPoint> {
    let embed_url = embed_url.trim();

    if let Ok(url) = Url::parse(embed_url) {
        // an empty `location=` falls through to the `@lat,lng` form
        if let Some((_, location)) = url
            .query_pairs()
            .find(|(key, value)| key == "location" && !value.is_empty())
        {
            debug!("Found location parameter: {}", location);
            return parse_pair(&location, ',');
        }
    }

    let point = embed_url
        .match_indices('@')
        .find_map(|(index, _)| parse_at_segment(&embed_url[index + 1..]));
    if point.is_none() {
        debug!("No coordinates in map address");
    }
    point
}

/// Find the map widget iframe in a page and return its (entity-decoded) `src`.
#[must_use]
pub fn find_map_embed(html: &str) -> Option<String> {
    let lower = html.to_ascii_lowercase();
    let mut offset = 0;

    while let Some(start) = lower[offset..].find("<iframe") {
        let tag_start = offset + start;
        let tag_end = lower[tag_start..]
            .find('>')
            .map_or(html.len(), |end| tag_start + end);
        let tag = &html[tag_start..tag_end];

        if let Some(src) = attribute(tag, "src") {
            let src = src.replace("&amp;", "&");
            if is_map_embed(&src) {
                return Some(src);
            }
        }
        offset = tag_end;
    }
    None
}

/// Accept either a bare embed address or a page containing the map iframe.
#[must_use]
pub fn locate(source: &str) -> Option<GeoPoint> {
    let source = source.trim();
    if source.to_ascii_lowercase().contains("<iframe") {
        return find_map_embed(source).and_then(|src| extract_coordinates(&src));
    }
    extract_coordinates(source)
}

fn parse_pair(text: &str, separator: char) -> Option<GeoPoint> {
    let (lat, lng) = text.split_once(separator)?;
    let lat = lat.trim().parse::<f64>().ok()?;
    let lng = lng.trim().parse::<f64>().ok()?;
    GeoPoint::try_new(lat, lng).ok()
}

/// Parses `-?d+.d+,-?d+.d+` at the start of `text`.
fn parse_at_segment(text: &str) -> Option<GeoPoint> {
    let (lat, rest) = leading_decimal(text)?;
    let rest = rest.strip_prefix(',')?;
    let (lng, _) = leading_decimal(rest)?;
    GeoPoint::try_new(lat, lng).ok()
}

fn leading_decimal(text: &str) -> Option<(f64, &str)> {
    let bytes = text.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == int_start || bytes.get(end) != Some(&b'.') {
        return None;
    }
    end += 1;

    let frac_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == frac_start {
        return None;
    }

    let value = text[..end].parse().ok()?;
    Some((value, &text[end..]))
}

fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let lower = tag.to_ascii_lowercase();
    let mut offset = 0;

    while let Some(found) = lower[offset..].find(name) {
        let name_start = offset + found;
        offset = name_start + name.len();

        let preceded_by_space = name_start > 0
            && lower.as_bytes()[name_start - 1].is_ascii_whitespace();
        if !preceded_by_space {
            continue;
        }

        let rest = tag[offset..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();

        return match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let value = &rest[1..];
                value.find(quote).map(|end| &value[..end])
            }
            Some(_) => Some(rest.split_whitespace().next().unwrap_or(rest)),
            None => None,
        };
    }
    None
}
