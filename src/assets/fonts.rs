use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Font weights the composers ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weight {
    Regular,
    Bold,
    /// 900.
    Black,
}

impl Weight {
    fn css_value(self) -> u16 {
        match self {
            Weight::Regular => 400,
            Weight::Bold => 700,
            Weight::Black => 900,
        }
    }
}

/// One (weight, italic) combination the font book can hold a face for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceSlot {
    pub weight: Weight,
    pub italic: bool,
}

impl FaceSlot {
    pub const REGULAR: Self = Self::upright(Weight::Regular);
    pub const BOLD: Self = Self::upright(Weight::Bold);
    pub const BLACK: Self = Self::upright(Weight::Black);
    pub const ITALIC: Self = Self {
        weight: Weight::Regular,
        italic: true,
    };

    pub const ALL: [Self; 4] = [Self::REGULAR, Self::BOLD, Self::BLACK, Self::ITALIC];

    pub const fn upright(weight: Weight) -> Self {
        Self {
            weight,
            italic: false,
        }
    }

    fn fallbacks(self) -> &'static [FaceSlot] {
        match (self.weight, self.italic) {
            (Weight::Black, _) => &[FaceSlot::BLACK, FaceSlot::BOLD, FaceSlot::REGULAR],
            (Weight::Bold, _) => &[FaceSlot::BOLD, FaceSlot::REGULAR],
            (Weight::Regular, true) => &[FaceSlot::ITALIC, FaceSlot::REGULAR],
            (Weight::Regular, false) => &[FaceSlot::REGULAR, FaceSlot::BOLD],
        }
    }
}

/// Raw font file bytes plus the face index inside the file (non-zero for collections).
#[derive(Clone)]
pub struct FontFace {
    pub bytes: Arc<Vec<u8>>,
    pub index: u32,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

/// The faces text is drawn with, keyed by [`FaceSlot`].
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    faces: HashMap<FaceSlot, FontFace>,
}

impl FontBook {
    /// A book with no faces. Surfaces built from it draw no text.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Use one font file for every slot.
    pub fn from_font_bytes(bytes: Vec<u8>) -> Self {
        let face = FontFace {
            bytes: Arc::new(bytes),
            index: 0,
        };
        let mut book = Self::empty();
        for slot in FaceSlot::ALL {
            book.insert(slot, face.clone());
        }
        book
    }

    /// Discover sans-serif faces.
    ///
    /// Fonts in `extra_dirs` win over system fonts when any are found there.
    pub fn discover(extra_dirs: &[PathBuf]) -> Self {
        if !extra_dirs.is_empty() {
            let mut user_db = usvg::fontdb::Database::new();
            for dir in extra_dirs {
                user_db.load_fonts_dir(dir);
            }
            if !user_db.is_empty() {
                tracing::debug!(faces = user_db.len(), "using fonts from user directories");
                return Self::from_database(&user_db);
            }
            tracing::warn!(?extra_dirs, "no usable fonts in font directories");
        }

        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        Self::from_database(&db)
    }

    /// Pick one face per slot out of a font database.
    pub fn from_database(db: &usvg::fontdb::Database) -> Self {
        // Prefer the first family the database knows about when none of the usual
        // sans-serif families are installed.
        let first_family = db
            .faces()
            .find_map(|f| f.families.first().map(|(name, _)| name.clone()));

        let mut families = vec![
            usvg::fontdb::Family::Name("Inter"),
            usvg::fontdb::Family::Name("Helvetica Neue"),
            usvg::fontdb::Family::Name("Helvetica"),
            usvg::fontdb::Family::Name("Arial"),
            usvg::fontdb::Family::Name("Liberation Sans"),
            usvg::fontdb::Family::Name("DejaVu Sans"),
            usvg::fontdb::Family::Name("Noto Sans"),
            usvg::fontdb::Family::SansSerif,
        ];
        if let Some(name) = first_family.as_deref() {
            families.push(usvg::fontdb::Family::Name(name));
        }

        let mut book = Self::empty();
        for slot in FaceSlot::ALL {
            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(slot.weight.css_value()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: if slot.italic {
                    usvg::fontdb::Style::Italic
                } else {
                    usvg::fontdb::Style::Normal
                },
            };
            let Some(id) = db.query(&query).or_else(|| db.faces().next().map(|f| f.id)) else {
                continue;
            };
            let face = db.with_face_data(id, |data, index| FontFace {
                bytes: Arc::new(data.to_vec()),
                index,
            });
            if let Some(face) = face {
                book.insert(slot, face);
            }
        }

        if book.is_empty() {
            tracing::warn!("no fonts found; composites will be rendered without text");
        }
        book
    }

    pub fn insert(&mut self, slot: FaceSlot, face: FontFace) {
        self.faces.insert(slot, face);
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Face for `slot`, falling back to a nearby slot (black → bold → regular, italic → regular).
    pub fn resolve(&self, slot: FaceSlot) -> Option<(FaceSlot, &FontFace)> {
        slot.fallbacks()
            .iter()
            .find_map(|s| self.faces.get(s).map(|f| (*s, f)))
            .or_else(|| {
                FaceSlot::ALL
                    .iter()
                    .find_map(|s| self.faces.get(s).map(|f| (*s, f)))
            })
    }
}

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

struct SlotShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
}

/// Builds single-line Parley layouts, one font context per face so the shaped glyph ids always
/// belong to the face that will rasterize them.
pub struct TextLayoutEngine {
    shapers: HashMap<FaceSlot, SlotShaper>,
}

impl TextLayoutEngine {
    pub fn new(book: &FontBook) -> Self {
        let mut shapers = HashMap::new();
        for slot in FaceSlot::ALL {
            let Some(face) = book.faces.get(&slot) else {
                continue;
            };
            match SlotShaper::new(face) {
                Some(shaper) => {
                    shapers.insert(slot, shaper);
                }
                None => tracing::warn!(?slot, "font face registered no families; slot unusable"),
            }
        }
        Self { shapers }
    }

    /// Shape `text` on one line with the face for `slot` (after fallback).
    ///
    /// Returns the slot that was actually used alongside the layout, or `None` when no face is
    /// available or the size is not a positive finite number.
    pub fn layout_line(
        &mut self,
        slot: FaceSlot,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> Option<(FaceSlot, parley::Layout<TextBrushRgba8>)> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return None;
        }
        let used = slot
            .fallbacks()
            .iter()
            .copied()
            .chain(FaceSlot::ALL)
            .find(|s| self.shapers.contains_key(s))?;
        let shaper = self.shapers.get_mut(&used)?;

        let mut builder = shaper
            .layout_ctx
            .ranged_builder(&mut shaper.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(shaper.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Some((used, layout))
    }
}

impl SlotShaper {
    fn new(face: &FontFace) -> Option<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.bytes.as_ref().clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id)?;
        let family_name = font_ctx.collection.family_name(family_id)?.to_string();
        Some(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
