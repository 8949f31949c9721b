//! Orientation-aware image delivery.
//!
//! The image URL and layout class are derived from the element's data
//! attributes and the viewport by the pure [`resolve`], then written to the
//! image element by [`apply`]. The hook recomputes synchronously on mount,
//! on every update and on every `resize`/`orientationchange`, without
//! debouncing.

use reader_common::{BrowserEvent, HookFault, HookKind, Orientation, ViewportState};
use reader_config::ImageConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::hook::{Hook, HookContext};
use crate::host::Host;

pub const BASE_URL_ATTR: &str = "data-base-url";
pub const COMIC_ID_ATTR: &str = "data-comic-id";
pub const CURRENT_PAGE_ATTR: &str = "data-current-page";

/// Page-identifying attributes of the hook element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub base_url: Option<String>,
    pub comic_id: Option<String>,
    pub current_page: Option<String>,
}

impl ImageDescriptor {
    pub fn read<H: Host>(host: &H, element: &H::Node) -> Self {
        Self {
            base_url: host.attribute(element, BASE_URL_ATTR),
            comic_id: host.attribute(element, COMIC_ID_ATTR),
            current_page: host.attribute(element, CURRENT_PAGE_ATTR),
        }
    }

    /// Attribute names (without the `data-` prefix) that are absent.
    pub fn missing_attributes(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.base_url.is_none() {
            missing.push("base-url");
        }
        if self.comic_id.is_none() {
            missing.push("comic-id");
        }
        if self.current_page.is_none() {
            missing.push("current-page");
        }
        missing
    }

    /// The resource path before any orientation-specific query.
    ///
    /// With both `comic_id` and `current_page` present the page route is
    /// filled in from them, so navigation only needs `data-current-page` to
    /// change. Otherwise `base_url` is used when present, and failing that
    /// the route is filled with whatever segments exist.
    pub fn resource_path(&self, config: &ImageConfig) -> String {
        match (&self.comic_id, &self.current_page, &self.base_url) {
            (Some(comic), Some(page), _) => fill_route(&config.page_route, comic, page),
            (_, _, Some(base)) => base.clone(),
            (comic, page, None) => fill_route(
                &config.page_route,
                comic.as_deref().unwrap_or(""),
                page.as_deref().unwrap_or(""),
            ),
        }
    }
}

fn fill_route(route: &str, comic_id: &str, current_page: &str) -> String {
    route
        .replace("{comic_id}", comic_id)
        .replace("{current_page}", current_page)
}

/// Image source and class for one viewport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedImage {
    pub url: String,
    #[serde(rename = "layoutClass")]
    pub layout_class: String,
    pub orientation: Orientation,
}

/// Derive the image URL and layout class.
///
/// Portrait (height strictly greater than width) appends
/// `height=<portrait_height>`; landscape, including a square viewport, uses
/// the resource path unchanged.
pub fn resolve(
    descriptor: &ImageDescriptor,
    viewport: ViewportState,
    config: &ImageConfig,
) -> ResolvedImage {
    let path = descriptor.resource_path(config);
    match viewport.orientation() {
        Orientation::Portrait => ResolvedImage {
            url: append_query(&path, "height", &config.portrait_height.to_string()),
            layout_class: config.portrait_class.clone(),
            orientation: Orientation::Portrait,
        },
        Orientation::Landscape => ResolvedImage {
            url: path,
            layout_class: config.landscape_class.clone(),
            orientation: Orientation::Landscape,
        },
    }
}

/// Write a resolved image to the image element.
pub fn apply<H: Host>(host: &H, image: &H::Node, resolved: &ResolvedImage) {
    host.set_attribute(image, "src", &resolved.url);
    host.set_attribute(image, "class", &resolved.layout_class);
}

fn append_query(path: &str, key: &str, value: &str) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}{key}={value}")
}

pub struct AdaptiveImageResolver {
    config: ImageConfig,
    descriptor: ImageDescriptor,
}

impl AdaptiveImageResolver {
    pub fn new(config: ImageConfig) -> Self {
        Self {
            config,
            descriptor: ImageDescriptor::default(),
        }
    }

    pub fn descriptor(&self) -> &ImageDescriptor {
        &self.descriptor
    }

    fn read_attributes<H: Host>(&mut self, ctx: &HookContext<'_, H>) {
        self.descriptor = ImageDescriptor::read(ctx.host(), ctx.element());
        for name in self.descriptor.missing_attributes() {
            debug!(hook = %ctx.id(), fault = %HookFault::AttributeMissing(name), "reading image attributes");
        }
    }

    /// Resolve against the current viewport and apply to the image element.
    /// Returns `None` when the element holds no image.
    pub fn recompute<H: Host>(&self, host: &H, element: &H::Node) -> Option<ResolvedImage> {
        let Some(image) = host.query_selector(element, &self.config.selector) else {
            debug!(fault = %HookFault::MissingElement(self.config.selector.clone()), "recompute skipped");
            return None;
        };
        let resolved = resolve(&self.descriptor, host.viewport(), &self.config);
        apply(host, &image, &resolved);
        debug!(url = %resolved.url, orientation = ?resolved.orientation, "image source updated");
        Some(resolved)
    }
}

impl<H: Host> Hook<H> for AdaptiveImageResolver {
    fn kind(&self) -> HookKind {
        HookKind::ResponsiveImage
    }

    fn mounted(&mut self, ctx: &mut HookContext<'_, H>) {
        self.read_attributes(ctx);
        ctx.listen(BrowserEvent::Resize);
        ctx.listen(BrowserEvent::OrientationChange);
        self.recompute(ctx.host(), ctx.element());
    }

    fn updated(&mut self, ctx: &mut HookContext<'_, H>) {
        self.read_attributes(ctx);
        self.recompute(ctx.host(), ctx.element());
    }

    fn on_browser_event(&mut self, event: BrowserEvent, ctx: &mut HookContext<'_, H>) {
        match event {
            BrowserEvent::Resize | BrowserEvent::OrientationChange => {
                self.recompute(ctx.host(), ctx.element());
            }
            BrowserEvent::FullscreenChange => {}
        }
    }
}
