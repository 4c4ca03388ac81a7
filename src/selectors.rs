//! Shared Selectors

use once_cell::sync::Lazy;
use scraper::Selector;

/// Inline `<script>` blocks (no external source).
pub static INLINE_SCRIPT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script:not([src])").expect("valid inline script selector"));

pub static SEARCH_ITEM_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.s-item__link, a[href]").expect("valid search link selector"));

pub static SEARCH_ITEM_TITLE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".s-item__title, h3, h2").expect("valid search title selector")
});

pub static SEARCH_ITEM_PRICE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".s-item__price").expect("valid search price selector"));

/// Profile display name (`<a class="mbg-id">` on classic pages).
pub static PROFILE_NAME: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a.mbg-id, span.mbg-nw, h1").expect("valid profile name selector")
});

/// Feedback score link next to the name.
pub static PROFILE_SCORE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.mbg-l a").expect("valid feedback score selector"));

/// "99.8% positive feedback" block.
pub static PROFILE_POSITIVE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.perctg").expect("valid positive feedback selector"));

pub static PROFILE_LOCATION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.mem_loc").expect("valid location selector"));

/// Info spans in the member box; one of them carries "Member since".
pub static PROFILE_INFO: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#member_info span.info").expect("valid member info selector"));

pub static PROFILE_BIO: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.bio, h2.bio").expect("valid bio selector"));
