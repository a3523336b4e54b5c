use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Multipart form used to register or modify a shop.
#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct ShopFormDoc {
    /// Shop JSON, e.g. `{"shopName":"Tea House","areaId":2,"shopCategoryId":10,"ownerId":1}`
    pub shopStr: String,
    /// Optional image file
    #[schema(value_type = Option<String>, format = Binary)]
    pub shopImg: Option<Vec<u8>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::shops::init_info,
        crate::routes::shops::register,
        crate::routes::shops::modify,
        crate::routes::shops::get,
        crate::routes::shops::list,
    ),
    components(
        schemas(
            HealthResponse,
            ShopFormDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "shop")
    )
)]
pub struct ApiDoc;
