//! Drawing backend wrapper that tolerates missing fonts.
//!
//! Plotters resolves system fonts lazily the first time text is measured or
//! drawn. On a headless machine without fontconfig or any installed font that
//! lookup either errors or panics, which would otherwise fail the whole
//! figure. This wrapper forwards everything to the inner backend and, once
//! text handling has failed, draws figures without text (axes, series and
//! mesh are unaffected).
//!
//! A panic caught here has already gone through the process panic hook, so
//! the first failed lookup still prints a panic message to stderr. After
//! that, text is skipped without calling into the font code again.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};

use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
};

pub struct TextSafeBackend<DB> {
    inner: DB,
    text_broken: Cell<bool>,
}

impl<DB> TextSafeBackend<DB> {
    pub fn new(inner: DB) -> Self {
        Self {
            inner,
            text_broken: Cell::new(false),
        }
    }

    fn disable_text(&self, reason: &str) {
        if !self.text_broken.replace(true) {
            log::warn!(
                "Font rendering unavailable ({reason}); drawing figure without text. \
                 Any panic message printed just before this comes from the font lookup \
                 and does not affect the output."
            );
        }
    }
}

impl<DB: DrawingBackend> DrawingBackend for TextSafeBackend<DB> {
    type ErrorType = DB::ErrorType;

    fn get_size(&self) -> (u32, u32) {
        self.inner.get_size()
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.ensure_prepared()
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.present()
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_pixel(point, color)
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_line(from, to, style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_rect(upper_left, bottom_right, style, fill)
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_path(path, style)
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_circle(center, radius, style, fill)
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.fill_polygon(vert, style)
    }

    fn blit_bitmap(
        &mut self,
        pos: BackendCoord,
        (iw, ih): (u32, u32),
        src: &[u8],
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.blit_bitmap(pos, (iw, ih), src)
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        if self.text_broken.get() {
            return Ok(());
        }
        let inner = &mut self.inner;
        match panic::catch_unwind(AssertUnwindSafe(|| inner.draw_text(text, style, pos))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(DrawingErrorKind::FontError(e))) => {
                self.disable_text(&e.to_string());
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(_) => {
                self.disable_text("font lookup panicked");
                Ok(())
            }
        }
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        if !self.text_broken.get() {
            let measure = || self.inner.estimate_text_size(text, style);
            match panic::catch_unwind(AssertUnwindSafe(measure)) {
                Ok(Ok(size)) => return Ok(size),
                Ok(Err(DrawingErrorKind::FontError(e))) => self.disable_text(&e.to_string()),
                Ok(Err(e)) => return Err(e),
                Err(_) => self.disable_text("font lookup panicked"),
            }
        }
        Ok(approximate_text_size(text, style.size()))
    }
}

/// Rough glyph-box estimate used for layout when no font can be measured.
fn approximate_text_size(text: &str, size: f64) -> (u32, u32) {
    let chars = text.chars().count() as f64;
    ((chars * size * 3.0 / 5.0).ceil() as u32, size.ceil() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotters::style::{IntoFont, TextStyle};

    /// Backend whose font lookup always panics.
    #[derive(Default)]
    struct NoFonts {
        text_calls: Cell<usize>,
    }

    impl NoFonts {
        fn lookup(&self) -> ! {
            self.text_calls.set(self.text_calls.get() + 1);
            panic!("no fonts installed");
        }
    }

    impl DrawingBackend for NoFonts {
        type ErrorType = std::io::Error;

        fn get_size(&self) -> (u32, u32) {
            (10, 10)
        }

        fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
            Ok(())
        }

        fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
            Ok(())
        }

        fn draw_pixel(
            &mut self,
            _point: BackendCoord,
            _color: BackendColor,
        ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
            Ok(())
        }

        fn draw_text<TStyle: BackendTextStyle>(
            &mut self,
            _text: &str,
            _style: &TStyle,
            _pos: BackendCoord,
        ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
            self.lookup()
        }

        fn estimate_text_size<TStyle: BackendTextStyle>(
            &self,
            _text: &str,
            _style: &TStyle,
        ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
            self.lookup()
        }
    }

    #[test]
    fn font_panic_is_hit_once_then_text_is_skipped() {
        let mut backend = TextSafeBackend::new(NoFonts::default());
        let style = TextStyle::from(("sans-serif", 10.0).into_font());

        assert_eq!(backend.estimate_text_size("abc", &style).unwrap(), (18, 10));
        assert!(backend.draw_text("abc", &style, (0, 0)).is_ok());
        assert_eq!(backend.estimate_text_size("abcdef", &style).unwrap(), (36, 10));
        assert_eq!(backend.inner.text_calls.get(), 1);
    }

    #[test]
    fn approximation_scales_with_length_and_size() {
        assert_eq!(approximate_text_size("", 12.0), (0, 12));
        let (w1, _) = approximate_text_size("abc", 10.0);
        let (w2, _) = approximate_text_size("abcdef", 10.0);
        assert_eq!(w1, 18);
        assert_eq!(w2, 36);
    }
}
