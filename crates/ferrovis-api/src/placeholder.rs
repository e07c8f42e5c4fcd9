//! Routes whose business logic (auth, workout logging, buddies) does not
//! exist yet. Each answers `501 Not Implemented` with a JSON body so clients
//! can already be wired against the final paths.

use crate::error::ApiError;

/// `POST /auth/register`
pub async fn register() -> ApiError { ApiError::NotImplemented("register") }

/// `POST /auth/login`
pub async fn login() -> ApiError { ApiError::NotImplemented("login") }

/// `GET /user/profile`
pub async fn get_profile() -> ApiError { ApiError::NotImplemented("get user profile") }

/// `PUT /user/profile`
pub async fn update_profile() -> ApiError { ApiError::NotImplemented("update user profile") }

/// `POST /workouts`
pub async fn create_workout() -> ApiError { ApiError::NotImplemented("create workout") }

/// `GET /workouts`
pub async fn list_workouts() -> ApiError { ApiError::NotImplemented("list workouts") }

/// `GET /workouts/:id`
pub async fn get_workout() -> ApiError { ApiError::NotImplemented("get workout") }

/// `POST /buddies/invite`
pub async fn invite_buddy() -> ApiError { ApiError::NotImplemented("invite buddy") }

/// `GET /buddies`
pub async fn list_buddies() -> ApiError { ApiError::NotImplemented("list buddies") }
