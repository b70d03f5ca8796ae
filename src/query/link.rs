//! Shareable links carrying the current clan tag.

use url::Url;

use crate::fetch::CLAN_TAG_PARAM;
use crate::models::ClanTag;

/// Set the `clanTag` parameter on `base`, keeping any other parameters.
pub fn link_for(base: &Url, tag: &ClanTag) -> Url {
    let others: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != CLAN_TAG_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &others {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(CLAN_TAG_PARAM, tag.as_str());
    }
    url
}

/// Read the decoded `clanTag` parameter. Absent or empty yields `None`.
pub fn tag_from_link(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == CLAN_TAG_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
