//! Creative payloads returned by the Real-time Bidding API and a console
//! printer for them.
//!
//! Only the fields the printer shows are modelled. JSON uses the API's
//! camelCase names; every field the API may omit is optional.
use std::fmt::Display;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::result::Result;

/// An advertisement asset and its serving decision.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Creative {
    /// Resource name, `buyers/{accountId}/creatives/{creativeId}`.
    pub name: Option<String>,
    pub creative_id: String,
    pub version: Option<i64>,
    /// `HTML`, `NATIVE` or `VIDEO`.
    pub creative_format: Option<String>,
    pub creative_serving_decision: CreativeServingDecision,
    pub declared_click_through_urls: Option<Vec<String>>,
    pub declared_attributes: Option<Vec<String>>,
    pub declared_vendor_ids: Option<Vec<i64>>,
    pub declared_restricted_categories: Option<Vec<String>>,
    pub html: Option<HtmlContent>,
    pub native: Option<NativeContent>,
    pub video: Option<VideoContent>,
}

/// Serving status of a creative per auction environment.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreativeServingDecision {
    pub deals_serving_status: ServingStatus,
    pub open_auction_serving_status: ServingStatus,
    pub china_serving_status: ServingStatus,
    pub russia_serving_status: ServingStatus,
}

/// e.g. `APPROVED`, `DISAPPROVED`, `PENDING_REVIEW`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServingStatus {
    #[allow(missing_docs)]
    pub status: Option<String>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HtmlContent {
    pub snippet: Option<String>,
    pub height: Option<i64>,
    pub width: Option<i64>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NativeContent {
    pub headline: Option<String>,
    pub body: Option<String>,
    pub call_to_action: Option<String>,
    pub advertiser_name: Option<String>,
    pub star_rating: Option<f64>,
    pub click_link_url: Option<String>,
    pub click_tracking_url: Option<String>,
    pub price_display_text: Option<String>,
    pub image: Option<Image>,
    pub logo: Option<Image>,
    pub app_icon: Option<Image>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Image {
    pub url: Option<String>,
    pub height: Option<i64>,
    pub width: Option<i64>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoContent {
    pub video_url: Option<String>,
    pub video_vast_xml: Option<String>,
}

/// One page of `buyers.creatives.list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListCreativesResponse {
    /// Creatives on this page.
    pub creatives: Vec<Creative>,
    /// Token of the next page, absent on the last one.
    pub next_page_token: Option<String>,
}

/// Prints `creative` to stdout.
pub fn print_creative(creative: &Creative) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_creative(&mut out, creative)?;
    out.flush()?;
    Ok(())
}

/// Writes the human-readable rendering of `creative` to `out`.
pub fn write_creative<W: Write>(out: &mut W, creative: &Creative) -> io::Result<()> {
    writeln!(out, "* Creative ID: {}", creative.creative_id)?;

    if let Some(version) = creative.version {
        writeln!(out, "\t- Version: {}", version)?;
    }

    writeln!(out, "\t- Creative format: {}", show(&creative.creative_format))?;

    let decision = &creative.creative_serving_decision;
    writeln!(out, "\t- Creative Serving Decision")?;
    writeln!(out, "\t\tDeals Serving Status: {}", show(&decision.deals_serving_status.status))?;
    writeln!(
        out,
        "\t\tOpen Auction Serving Status: {}",
        show(&decision.open_auction_serving_status.status)
    )?;
    writeln!(out, "\t\tChina Serving Status: {}", show(&decision.china_serving_status.status))?;
    writeln!(out, "\t\tRussia Serving Status: {}", show(&decision.russia_serving_status.status))?;

    write_list(out, "Declared Click-Through URLs", &creative.declared_click_through_urls)?;
    write_list(out, "Declared Attributes", &creative.declared_attributes)?;
    write_list(out, "Declared Vendor IDs", &creative.declared_vendor_ids)?;
    write_list(out, "Declared Restricted Categories", &creative.declared_restricted_categories)?;

    if let Some(html) = &creative.html {
        writeln!(out, "\t- HTML creative contents:")?;
        writeln!(out, "\t\tSnippet: {}", show(&html.snippet))?;
        writeln!(out, "\t\tHeight: {}", show(&html.height))?;
        writeln!(out, "\t\tWidth: {}", show(&html.width))?;
    }

    if let Some(native) = &creative.native {
        writeln!(out, "\t- Native creative contents:")?;
        writeln!(out, "\t\tHeadline: {}", show(&native.headline))?;
        writeln!(out, "\t\tBody: {}", show(&native.body))?;
        writeln!(out, "\t\tCallToAction: {}", show(&native.call_to_action))?;
        writeln!(out, "\t\tAdvertiser Name: {}", show(&native.advertiser_name))?;
        writeln!(out, "\t\tStar Rating: {}", show(&native.star_rating))?;
        writeln!(out, "\t\tClick Link URL: {}", show(&native.click_link_url))?;
        writeln!(out, "\t\tClick Tracking URL: {}", show(&native.click_tracking_url))?;
        writeln!(out, "\t\tPrice Display Text: {}", show(&native.price_display_text))?;
        write_image(out, "Image", &native.image)?;
        write_image(out, "Logo", &native.logo)?;
        write_image(out, "App Icon", &native.app_icon)?;
    }

    if let Some(video) = &creative.video {
        writeln!(out, "\t- Video creative contents:")?;
        if let Some(url) = &video.video_url {
            writeln!(out, "\t\tVideo URL: {}", url)?;
        }
        if let Some(xml) = &video.video_vast_xml {
            writeln!(out, "\t\tVideo VAST XML: {}", xml)?;
        }
    }

    Ok(())
}

fn write_list<W: Write, T: Display>(
    out: &mut W,
    title: &str,
    items: &Option<Vec<T>>,
) -> io::Result<()> {
    if let Some(items) = items {
        writeln!(out, "\t- {}:", title)?;
        for item in items {
            writeln!(out, "\t\t{}", item)?;
        }
    }
    Ok(())
}

fn write_image<W: Write>(out: &mut W, title: &str, image: &Option<Image>) -> io::Result<()> {
    if let Some(image) = image {
        writeln!(out, "\t\t{} contents:", title)?;
        writeln!(out, "\t\t\tURL: {}", show(&image.url))?;
        writeln!(out, "\t\t\tHeight: {}", show(&image.height))?;
        writeln!(out, "\t\t\tWidth: {}", show(&image.width))?;
    }
    Ok(())
}

/// Missing values print as empty strings.
fn show<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(creative: &Creative) -> String {
        let mut buf = Vec::new();
        write_creative(&mut buf, creative).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn html_creative() {
        let json = r#"{
            "name": "buyers/12345/creatives/cr-1",
            "creativeId": "cr-1",
            "version": 3,
            "creativeFormat": "HTML",
            "creativeServingDecision": {
                "dealsServingStatus": {"status": "APPROVED"},
                "openAuctionServingStatus": {"status": "DISAPPROVED"},
                "chinaServingStatus": {"status": "PENDING_REVIEW"},
                "russiaServingStatus": {"status": "APPROVED"}
            },
            "declaredClickThroughUrls": ["https://example.com"],
            "declaredVendorIds": [113, 128],
            "html": {"snippet": "<div/>", "height": 250, "width": 300}
        }"#;
        let creative: Creative = serde_json::from_str(json).unwrap();

        let expected = "* Creative ID: cr-1\n\
            \t- Version: 3\n\
            \t- Creative format: HTML\n\
            \t- Creative Serving Decision\n\
            \t\tDeals Serving Status: APPROVED\n\
            \t\tOpen Auction Serving Status: DISAPPROVED\n\
            \t\tChina Serving Status: PENDING_REVIEW\n\
            \t\tRussia Serving Status: APPROVED\n\
            \t- Declared Click-Through URLs:\n\
            \t\thttps://example.com\n\
            \t- Declared Vendor IDs:\n\
            \t\t113\n\
            \t\t128\n\
            \t- HTML creative contents:\n\
            \t\tSnippet: <div/>\n\
            \t\tHeight: 250\n\
            \t\tWidth: 300\n";
        assert_eq!(render(&creative), expected);
    }

    #[test]
    fn native_creative_with_partial_images() {
        let creative = Creative {
            creative_id: "cr-2".to_string(),
            creative_format: Some("NATIVE".to_string()),
            native: Some(NativeContent {
                headline: Some("Headline".to_string()),
                star_rating: Some(4.5),
                logo: Some(Image {
                    url: Some("https://example.com/logo.png".to_string()),
                    height: Some(50),
                    width: Some(50),
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let out = render(&creative);
        assert!(!out.contains("Version"));
        assert!(out.contains("\t\tHeadline: Headline\n"));
        assert!(out.contains("\t\tBody: \n"));
        assert!(out.contains("\t\tStar Rating: 4.5\n"));
        assert!(out.contains("\t\tLogo contents:\n\t\t\tURL: https://example.com/logo.png\n"));
        assert!(!out.contains("Image contents"));
        assert!(!out.contains("App Icon contents"));
    }

    #[test]
    fn video_creative_skips_missing_fields() {
        let creative = Creative {
            creative_id: "cr-3".to_string(),
            video: Some(VideoContent {
                video_url: Some("https://example.com/ad.mp4".to_string()),
                video_vast_xml: None,
            }),
            ..Default::default()
        };
        let out = render(&creative);
        assert!(out.ends_with(
            "\t- Video creative contents:\n\t\tVideo URL: https://example.com/ad.mp4\n"
        ));
        assert!(!out.contains("VAST"));
    }

    #[test]
    fn list_response_parses() {
        let json = r#"{"creatives": [{"creativeId": "a"}, {"creativeId": "b"}], "nextPageToken": "t"}"#;
        let page: ListCreativesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.creatives.len(), 2);
        assert_eq!(page.next_page_token.as_deref(), Some("t"));
    }
}
