//! Photos and videos attached on the condominium step.

use serde::{Deserialize, Serialize};

use super::schema::{FileHandle, MimeGroup};

pub const FEATURED_PHOTO_SLOTS: usize = 4;
pub const MORE_PHOTO_SLOTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaSlot {
    CoverPhoto,
    FeaturedPhoto,
    MorePhoto,
    PropertyVideo,
    VirtualTour,
    AerialVideo,
}

impl MediaSlot {
    pub const fn label(self) -> &'static str {
        match self {
            MediaSlot::CoverPhoto => "Cover Photo",
            MediaSlot::FeaturedPhoto => "Featured Photo",
            MediaSlot::MorePhoto => "More Photos",
            MediaSlot::PropertyVideo => "Property Video",
            MediaSlot::VirtualTour => "Virtual Tour",
            MediaSlot::AerialVideo => "Aerial Video",
        }
    }

    pub const fn group(self) -> MimeGroup {
        match self {
            MediaSlot::CoverPhoto | MediaSlot::FeaturedPhoto | MediaSlot::MorePhoto => {
                MimeGroup::Photo
            }
            MediaSlot::PropertyVideo | MediaSlot::VirtualTour | MediaSlot::AerialVideo => {
                MimeGroup::Video
            }
        }
    }

    /// Number of indexed positions; `None` for single-file slots.
    pub const fn capacity(self) -> Option<usize> {
        match self {
            MediaSlot::FeaturedPhoto => Some(FEATURED_PHOTO_SLOTS),
            MediaSlot::MorePhoto => Some(MORE_PHOTO_SLOTS),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("{} slot {index} is out of range (capacity {capacity})", slot.label())]
    IndexOutOfRange {
        slot: MediaSlot,
        index: usize,
        capacity: usize,
    },
    #[error("{} needs a slot index", slot.label())]
    MissingIndex { slot: MediaSlot },
    #[error("{}: {}", slot.label(), slot.group().mismatch_message())]
    UnsupportedType { slot: MediaSlot, mime_type: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaGallery {
    pub cover_photo: Option<FileHandle>,
    pub featured_photos: [Option<FileHandle>; FEATURED_PHOTO_SLOTS],
    pub more_photos: [Option<FileHandle>; MORE_PHOTO_SLOTS],
    pub property_video: Option<FileHandle>,
    pub virtual_tour: Option<FileHandle>,
    pub aerial_video: Option<FileHandle>,
}

impl MediaGallery {
    pub fn upload(
        &mut self,
        slot: MediaSlot,
        index: Option<usize>,
        file: FileHandle,
    ) -> Result<(), MediaError> {
        if !slot.group().accepts(&file) {
            return Err(MediaError::UnsupportedType {
                slot,
                mime_type: file.mime_type,
            });
        }
        *self.position(slot, index)? = Some(file);
        Ok(())
    }

    pub fn remove(
        &mut self,
        slot: MediaSlot,
        index: Option<usize>,
    ) -> Result<Option<FileHandle>, MediaError> {
        Ok(self.position(slot, index)?.take())
    }

    pub fn featured_count(&self) -> usize {
        self.featured_photos.iter().flatten().count()
    }

    pub fn has_featured_photo(&self) -> bool {
        self.featured_count() > 0
    }

    fn position(
        &mut self,
        slot: MediaSlot,
        index: Option<usize>,
    ) -> Result<&mut Option<FileHandle>, MediaError> {
        let indexed: &mut [Option<FileHandle>] = match slot {
            MediaSlot::CoverPhoto => return Ok(&mut self.cover_photo),
            MediaSlot::PropertyVideo => return Ok(&mut self.property_video),
            MediaSlot::VirtualTour => return Ok(&mut self.virtual_tour),
            MediaSlot::AerialVideo => return Ok(&mut self.aerial_video),
            MediaSlot::FeaturedPhoto => &mut self.featured_photos,
            MediaSlot::MorePhoto => &mut self.more_photos,
        };

        let index = index.ok_or(MediaError::MissingIndex { slot })?;
        let capacity = indexed.len();
        indexed
            .get_mut(index)
            .ok_or(MediaError::IndexOutOfRange {
                slot,
                index,
                capacity,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg(name: &str) -> FileHandle {
        FileHandle::new(name, "image/jpeg")
    }

    #[test]
    fn featured_photos_fill_indexed_slots() {
        let mut gallery = MediaGallery::default();
        gallery
            .upload(MediaSlot::FeaturedPhoto, Some(2), jpeg("kitchen.jpg"))
            .expect("slot in range");
        assert_eq!(gallery.featured_count(), 1);
        assert_eq!(
            gallery.featured_photos[2].as_ref().map(|f| f.name.as_str()),
            Some("kitchen.jpg")
        );
    }

    #[test]
    fn rejects_out_of_range_and_missing_index() {
        let mut gallery = MediaGallery::default();
        let err = gallery
            .upload(MediaSlot::FeaturedPhoto, Some(4), jpeg("x.jpg"))
            .expect_err("only four featured slots");
        assert_eq!(
            err,
            MediaError::IndexOutOfRange {
                slot: MediaSlot::FeaturedPhoto,
                index: 4,
                capacity: 4
            }
        );

        let err = gallery
            .upload(MediaSlot::MorePhoto, None, jpeg("x.jpg"))
            .expect_err("index needed");
        assert_eq!(err, MediaError::MissingIndex { slot: MediaSlot::MorePhoto });
    }

    #[test]
    fn videos_reject_photos() {
        let mut gallery = MediaGallery::default();
        let err = gallery
            .upload(MediaSlot::VirtualTour, None, jpeg("tour.jpg"))
            .expect_err("photo in a video slot");
        assert_eq!(err.to_string(), "Virtual Tour: Only MP4 or MOV videos are allowed");
        assert!(gallery.virtual_tour.is_none());
    }

    #[test]
    fn remove_returns_previous_file() {
        let mut gallery = MediaGallery::default();
        gallery
            .upload(MediaSlot::CoverPhoto, None, FileHandle::new("c.png", "image/png"))
            .expect("png accepted");
        let removed = gallery.remove(MediaSlot::CoverPhoto, None).expect("single slot");
        assert_eq!(removed.map(|f| f.name), Some("c.png".to_string()));
        assert!(gallery.cover_photo.is_none());
    }
}
