//! Request to record mapping. Pure, no I/O, no validation.

use super::model::{Customer, ProfilePic};
use super::validator::{ValidatedPicture, ValidatedRequest};

/// Build the persisted record for `id`, stamped with `created_at`
pub fn to_record(id: &str, created_at: &str, request: &ValidatedRequest) -> Customer {
    Customer {
        customer_id: id.to_string(),
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        email: request.email.clone(),
        age: request.age,
        date_created: created_at.to_string(),
        is_active: request.is_active,
        balance: request.balance,
        profile_pic: request.profile_pic.as_ref().map(to_picture),
        country_code: request.country_code.clone(),
    }
}

fn to_picture(picture: &ValidatedPicture) -> ProfilePic {
    ProfilePic {
        url: picture.url.clone(),
        content_type: picture.content_type.clone(),
        size_bytes: picture.size_bytes,
    }
}
