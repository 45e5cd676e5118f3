//! # 이미지 편집기 어댑터
//!
//! 실제 픽셀 처리는 외부 편집 위젯이 담당합니다. 이 모듈은 그 위젯이 제공하는 기능을
//! `ImageEditor` 트레이트로 추상화하고, 저장된 편집 기록(`PhotoEdits`)을 편집기 호출 순서로
//! 풀어내는 `apply_edits`만 제공합니다.
//!
//! 코어가 편집기와 맺는 계약은 하나뿐입니다: "내보낸 data URL을 받아 `editedUrl`로 저장한다".

use thiserror::Error;

use crate::models::{CropRect, EditedPhoto, Photo, PhotoEdits};

/// 편집기 작업 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Crop,
    Draw,
    Text,
    Shape,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("Failed to load image '{0}'")]
    Load(String),

    #[error("Unsupported edit: {0}")]
    Unsupported(String),

    #[error("Failed to export image: {0}")]
    Export(String),
}

/// 외부 이미지 편집 위젯이 제공하는 기능 집합
pub trait ImageEditor {
    fn load_image(&mut self, url: &str) -> Result<(), EditorError>;

    /// 이름 있는 필터를 적용합니다. 밝기처럼 강도가 있는 필터는 `value`를 받습니다.
    fn apply_filter(&mut self, name: &str, value: Option<f64>) -> Result<(), EditorError>;

    fn start_mode(&mut self, mode: EditorMode) -> Result<(), EditorError>;

    /// 자르기 영역 지정 (`start_mode(Crop)` 이후)
    fn crop(&mut self, rect: &CropRect) -> Result<(), EditorError>;

    /// 시계 방향 회전 (도 단위)
    fn rotate(&mut self, degrees: i32) -> Result<(), EditorError>;

    fn flip_horizontal(&mut self) -> Result<(), EditorError>;

    fn set_brush_style(&mut self, width: u32, color: &str) -> Result<(), EditorError>;

    /// 현재 결과를 data URL로 내보냅니다.
    fn export_image(&mut self) -> Result<String, EditorError>;
}

/// 편집 기록을 편집기에 순서대로 적용하고, 내보낸 결과를 `EditedPhoto`로 돌려줍니다.
///
/// 적용 순서: 불러오기 → 필터 → 보정값(밝기/대비/채도) → 자르기 → 테두리 → 회전 → 반전 → 내보내기
pub fn apply_edits(
    editor: &mut dyn ImageEditor,
    photo: &Photo,
    edits: &PhotoEdits,
) -> Result<EditedPhoto, EditorError> {
    editor.load_image(&photo.url)?;

    if let Some(filter) = edits.filter.as_deref().filter(|f| !f.is_empty() && *f != "none") {
        editor.apply_filter(filter, None)?;
    }

    let adjustments = [
        ("brightness", edits.brightness),
        ("contrast", edits.contrast),
        ("saturation", edits.saturation),
    ];
    for (name, value) in adjustments {
        if let Some(value) = value {
            editor.apply_filter(name, Some(value))?;
        }
    }

    if let Some(rect) = &edits.crop {
        editor.start_mode(EditorMode::Crop)?;
        editor.crop(rect)?;
    }

    if let Some(border) = &edits.border {
        editor.start_mode(EditorMode::Draw)?;
        editor.set_brush_style(border.thickness, &border.color)?;
    }

    if let Some(degrees) = edits.rotation.filter(|d| d.rem_euclid(360) != 0) {
        editor.rotate(degrees)?;
    }

    if edits.mirrored == Some(true) {
        editor.flip_horizontal()?;
    }

    let data_url = editor.export_image()?;
    Ok(EditedPhoto {
        photo_id: photo.id.clone(),
        edits: edits.clone(),
        edited_url: Some(data_url),
    })
}
