//! Domain to wire conversions.

use agora_core::domain::{CreatorSummary, PostDetails};
use agora_shared::dto::{CreatorView, PostView};

pub fn creator_view(creator: &CreatorSummary) -> CreatorView {
    CreatorView {
        id: creator.id.to_string(),
        name: creator.name.clone(),
    }
}

pub fn post_view(details: &PostDetails) -> PostView {
    let post = &details.post;
    PostView {
        id: post.id.to_string(),
        title: post.title.clone(),
        content: post.content.clone(),
        image_url: post.image_url.clone(),
        creator_id: post.creator_id.to_string(),
        creator: details.creator.as_ref().map(creator_view),
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
    }
}
