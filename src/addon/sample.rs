//! Built-in demo addon.
//!
//! Serves a tiny static catalog of open movies and exercises every stage
//! and both resolver shapes (multi-format terminal resolution and a
//! chained page URL). The server registers it by default so the crate is
//! usable out of the box; the e2e tests and the CLI `resolve` command
//! drive it.

use std::sync::LazyLock;

use regex::Regex;

use super::{Addon, AddonManifest};
use crate::context::RequestContext;
use crate::handlers::{
    CatalogPage, CatalogRequest, HandlerError, RegistryError, Resolved,
    ResolveRequest, UrlMatch,
};
use crate::model::{
    IdMap, ImageMap, MediaIdentity, MediaItem, MediaType, ResolvedUrl, Source,
};

const ELEPHANTS_DREAM_IMDB: &str = "tt0807840";
const JELLYFISH_PAGE: &str = "https://test-videos.co.uk/jellyfish/mp4-h264";

static RE_PLAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"//videocdn\.demo\.test/play/(.*)").unwrap()
});

static RE_TEST_VIDEOS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"//test-videos\.co\.uk/(.*)").unwrap()
});

/// Build the demo addon with all handlers registered.
pub fn demo_addon() -> Result<Addon, RegistryError> {
    let manifest = AddonManifest::builder()
        .id("demo")
        .name("Demo")
        .version(env!("CARGO_PKG_VERSION"))
        .item_types(vec![MediaType::Movie, MediaType::Series])
        .triggers(vec!["name".to_string(), "imdb_id".to_string()])
        .build();

    let mut addon = Addon::new(manifest);
    addon.register_catalog(catalog)?;
    addon.register_item(item)?;
    addon.register_source(sources)?;
    addon.add_resolve_handler(RE_PLAY.clone(), resolve_play);
    addon.add_resolve_handler(RE_TEST_VIDEOS.clone(), resolve_test_videos);
    Ok(addon)
}

fn elephants_dream_brief() -> MediaItem {
    MediaItem {
        media_type: MediaType::Movie,
        ids: IdMap::from([("imdb_id".to_string(), ELEPHANTS_DREAM_IMDB.to_string())]),
        name: "Elephants Dream".to_string(),
        year: Some(2006),
        images: ImageMap::from([(
            "poster".to_string(),
            "https://orange.blender.org/wp-content/themes/orange/images/splash.jpg"
                .to_string(),
        )]),
        description: None,
        director: Vec::new(),
    }
}

fn big_buck_bunny() -> MediaItem {
    MediaItem {
        media_type: MediaType::Movie,
        ids: IdMap::from([("demo".to_string(), "big-buck-bunny".to_string())]),
        name: "Big Buck Bunny".to_string(),
        year: Some(2008),
        images: ImageMap::from([(
            "poster".to_string(),
            "https://peach.blender.org/wp-content/uploads/bbb-splash.png".to_string(),
        )]),
        description: Some(
            "Short computer-animated comedy film made by the Blender Institute."
                .to_string(),
        ),
        director: Vec::new(),
    }
}

fn name_matches(identity: &MediaIdentity, words: &[&str]) -> bool {
    let Some(name) = identity.name.as_deref() else {
        return false;
    };
    let name = name.to_lowercase();
    words.iter().all(|word| name.contains(word))
}

async fn catalog(
    _request: CatalogRequest,
    _ctx: RequestContext,
) -> Result<CatalogPage, HandlerError> {
    // The whole catalog fits one page.
    Ok(CatalogPage {
        items: vec![elephants_dream_brief(), big_buck_bunny()],
        next_cursor: None,
    })
}

async fn item(
    request: MediaIdentity,
    _ctx: RequestContext,
) -> Result<Option<MediaItem>, HandlerError> {
    if request.media_type == MediaType::Movie
        && request.id("imdb_id") == Some(ELEPHANTS_DREAM_IMDB)
    {
        let mut detail = elephants_dream_brief();
        detail.description = Some(
            "Proof-of-concept short made entirely with open tools by the \
             Orange Open Movie Project."
                .to_string(),
        );
        detail.director = vec!["Bassam Kurdali".to_string()];
        return Ok(Some(detail));
    }

    if name_matches(&request, &["big", "buck", "bunny"]) {
        return Ok(Some(big_buck_bunny()));
    }

    Ok(None)
}

async fn sources(
    request: MediaIdentity,
    _ctx: RequestContext,
) -> Result<Vec<Source>, HandlerError> {
    if request.media_type == MediaType::Movie
        && request.id("imdb_id") == Some(ELEPHANTS_DREAM_IMDB)
    {
        let url = format!(
            "https://videocdn.demo.test/play/{ELEPHANTS_DREAM_IMDB}"
        );
        return Ok(vec![
            Source::url("Resolver example", url).with_languages(["en"]),
        ]);
    }

    if name_matches(&request, &["big", "buck", "bunny"]) {
        return Ok(vec![Source::url(
            "1080p with 30fps",
            "http://distribution.bbb3d.renderfarming.net/video/mp4/bbb_sunflower_1080p_30fps_normal.mp4",
        )
        .with_languages(["en"])
        .with_quality("1080p")]);
    }

    if name_matches(&request, &["jellyfish"]) {
        return Ok(vec![
            Source::url(
                "Direct link",
                "https://test-videos.co.uk/vids/jellyfish/mp4/h264/720/Jellyfish_720_10s_30MB.mp4",
            )
            .with_quality("720p"),
            // A website, not a video; its resolve handler extracts the streams.
            Source::url("Resolver", JELLYFISH_PAGE),
        ]);
    }

    Ok(Vec::new())
}

async fn resolve_play(
    groups: UrlMatch,
    _request: ResolveRequest,
    _ctx: RequestContext,
) -> Result<Resolved, HandlerError> {
    let id = groups.group(1).unwrap_or_default();
    if id != ELEPHANTS_DREAM_IMDB {
        return Err(HandlerError::resolution(format!(
            "no stream found for id {id}"
        )));
    }

    Ok(Resolved::Urls(vec![
        ResolvedUrl::new(
            "https://thepaciellogroup.github.io/AT-browser-tests/video/ElephantsDream.mp4",
        )
        .with_name("Video in MP4 format")
        .with_format("mp4"),
        ResolvedUrl::new(
            "https://thepaciellogroup.github.io/AT-browser-tests/video/ElephantsDream.webm",
        )
        .with_name("Video in WEBM format")
        .with_format("webm"),
    ]))
}

async fn resolve_test_videos(
    _groups: UrlMatch,
    request: ResolveRequest,
    _ctx: RequestContext,
) -> Result<Resolved, HandlerError> {
    // The pattern also catches hosted video files; those need no page
    // scraping and pass through as-is.
    if request.url.ends_with(".mp4") {
        return Ok(ResolvedUrl::new(request.url.clone())
            .with_name("Direct link")
            .into());
    }

    if request.url != JELLYFISH_PAGE {
        return Err(HandlerError::resolution(format!(
            "no stream found on {}",
            request.url
        )));
    }

    let variants = [("1080", "1080p"), ("720", "720p"), ("360", "360p")];
    Ok(Resolved::Urls(
        variants
            .into_iter()
            .map(|(height, quality)| {
                ResolvedUrl::new(format!(
                    "https://test-videos.co.uk/vids/jellyfish/mp4/h264/{height}/Jellyfish_{height}_10s_30MB.mp4"
                ))
                .with_quality(quality)
            })
            .collect(),
    ))
}
