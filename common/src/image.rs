/// Default endpoint that synthesises an image from a text prompt in the path.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.pollinations.ai/prompt";

/// Size requested for images embedded in an exported deck.
pub const EXPORT_IMAGE_SIZE: (u32, u32) = (800, 600);
/// Size requested for images linked from the preview.
pub const PREVIEW_IMAGE_SIZE: (u32, u32) = (400, 300);

/// URL that renders `description` as an image of the given size.
pub fn image_url(base_url: &str, description: &str, (width, height): (u32, u32)) -> String {
    format!(
        "{}/{}?width={width}&height={height}&nologo=true",
        base_url.trim_end_matches('/'),
        urlencoding::encode(description)
    )
}
