pub mod create_post;
pub mod delete_post;
pub mod get_post;
pub mod list_posts;
pub mod update_post;

use std::collections::HashMap;

use uuid::Uuid;

use crate::application::dto::roommates::RoommateDto;
use crate::application::error::FieldErrors;
use crate::application::ports::image_repository::ImageRepository;
use crate::domain::attachments::image::{Image, ImageParent, sort_gallery};
use crate::domain::roommate::post::RoommatePost;

/// Occupancy and lease bounds shared by create and update.
pub(crate) fn check_terms(errors: &mut FieldErrors, current: i32, total: i32, lease: i32) {
    if lease < 1 {
        errors.add(
            "lease_duration",
            "Ensure this value is greater than or equal to 1.",
        );
    }
    if current < 0 {
        errors.add(
            "current_occupants",
            "Ensure this value is greater than or equal to 0.",
        );
    }
    if total < 1 {
        errors.add(
            "total_occupants",
            "Ensure this value is greater than or equal to 1.",
        );
    } else if current > total {
        errors.add(
            "current_occupants",
            "Current occupants cannot exceed total occupants.",
        );
    }
}

pub(crate) async fn with_images<I: ImageRepository + ?Sized>(
    images: &I,
    posts: Vec<RoommatePost>,
) -> anyhow::Result<Vec<RoommateDto>> {
    let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
    let mut by_parent: HashMap<Uuid, Vec<Image>> = HashMap::new();
    for image in images.list_for_parents(ImageParent::Roommate, &ids).await? {
        by_parent.entry(image.parent_id).or_default().push(image);
    }
    Ok(posts
        .into_iter()
        .map(|post| {
            let mut gallery = by_parent.remove(&post.id).unwrap_or_default();
            sort_gallery(&mut gallery);
            RoommateDto {
                post,
                images: gallery,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupancy_rules() {
        let mut ok = FieldErrors::new();
        check_terms(&mut ok, 1, 2, 6);
        assert!(ok.is_empty());

        let mut bad = FieldErrors::new();
        check_terms(&mut bad, 3, 2, 0);
        assert!(bad.contains("current_occupants"));
        assert!(bad.contains("lease_duration"));
    }
}
