use uvwarp_imgproc::warp::{warp_faces, FaceCorrespondence, Quad, WarpOptions, WarpReport};

use crate::{config::ExtractionConfig, error::ExtractError, host::TextureHost};

/// Outcome of [`extract_selected_faces`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionReport {
    /// Image that received the patches.
    pub destination: String,
    /// Selected faces reported by the host.
    pub faces_found: usize,
    /// Selected faces dropped because they are not quads.
    pub non_quad_filtered: usize,
    /// Per-face outcome of the warp.
    pub warp: WarpReport,
}

fn as_quad(face: &[[f64; 2]]) -> Option<Quad> {
    face.try_into().ok()
}

/// Pair the UV loops of two layers into quad correspondences.
///
/// Faces that do not have exactly four loops in both layers are dropped.
///
/// # Returns
///
/// The correspondences in face order and the number of faces dropped.
///
/// # Errors
///
/// [`ExtractError::LayerMismatch`] when the layers hold a different number of
/// faces.
pub fn collect_quad_faces(
    src_faces: &[Vec<[f64; 2]>],
    dst_faces: &[Vec<[f64; 2]>],
) -> Result<(Vec<FaceCorrespondence>, usize), ExtractError> {
    if src_faces.len() != dst_faces.len() {
        return Err(ExtractError::LayerMismatch(src_faces.len(), dst_faces.len()));
    }

    let mut faces = Vec::with_capacity(src_faces.len());
    let mut dropped = 0;
    for (src, dst) in src_faces.iter().zip(dst_faces) {
        match (as_quad(src), as_quad(dst)) {
            (Some(src_uv), Some(dst_uv)) => faces.push(FaceCorrespondence::new(src_uv, dst_uv)),
            _ => dropped += 1,
        }
    }

    Ok((faces, dropped))
}

/// Copy the selected faces of the source image into the destination image.
///
/// The source and destination UV layers give, for every selected quad face,
/// where the patch is read and where it is written. The destination pixels
/// are staged, every face is warped in order, and the result is handed back
/// to the host in one [`TextureHost::commit_image`] call. Faces whose
/// homography is degenerate are skipped and listed in the report.
///
/// Source and destination may be the same image; reads always see the
/// pixels from before the extraction.
///
/// # Errors
///
/// Any [`ExtractError`]; the destination is left unchanged in that case.
pub fn extract_selected_faces<H>(
    host: &mut H,
    config: &ExtractionConfig,
    options: &WarpOptions,
) -> Result<ExtractionReport, ExtractError>
where
    H: TextureHost + ?Sized,
{
    if !config.images_selected() {
        return Err(ExtractError::ImageNotSelected);
    }

    let (staged, faces_found, non_quad_filtered, warp) = {
        let src = host
            .image(&config.source_image)
            .ok_or_else(|| ExtractError::ImageNotFound(config.source_image.clone()))?;
        let dst = host
            .image(&config.destination_image)
            .ok_or_else(|| ExtractError::ImageNotFound(config.destination_image.clone()))?;

        if src.is_empty() {
            return Err(ExtractError::EmptyImage(config.source_image.clone()));
        }
        if dst.is_empty() {
            return Err(ExtractError::EmptyImage(config.destination_image.clone()));
        }

        let src_faces = host
            .selected_face_uvs(&config.source_uv_layer)
            .ok_or_else(|| ExtractError::UvLayerNotFound(config.source_uv_layer.clone()))?;
        let dst_faces = host
            .selected_face_uvs(&config.destination_uv_layer)
            .ok_or_else(|| ExtractError::UvLayerNotFound(config.destination_uv_layer.clone()))?;

        let (faces, non_quad_filtered) = collect_quad_faces(&src_faces, &dst_faces)?;
        if faces.is_empty() {
            return Err(ExtractError::NoQuadFaces);
        }
        if non_quad_filtered > 0 {
            log::debug!("ignoring {} selected non-quad face(s)", non_quad_filtered);
        }

        let mut staged = dst.to_buffer();
        let warp = warp_faces(&src, &mut staged.view_mut(), &faces, options)?;

        (staged, src_faces.len(), non_quad_filtered, warp)
    };

    host.commit_image(&config.destination_image, staged.as_slice())?;

    log::info!(
        "extracted {} face(s) into {} ({} skipped)",
        warp.faces_processed,
        config.destination_image,
        warp.skipped.len()
    );

    Ok(ExtractionReport {
        destination: config.destination_image.clone(),
        faces_found,
        non_quad_filtered,
        warp,
    })
}
