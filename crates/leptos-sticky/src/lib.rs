//! Leptos Sticky Utilities
//!
//! Sticky-on-scroll container for Leptos.
//! Switches a container to fixed positioning once the page is scrolled past
//! its natural offset, and reserves a placeholder of the same height so the
//! layout below does not jump.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Geometry measured from the container while it is still in normal flow
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StickyGeometry {
    /// Distance from the document top to the container top
    pub natural_top: f64,
    /// Rendered height of the container
    pub height: f64,
}

/// Layout decision for one scroll position
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StickyLayout {
    pub fixed: bool,
    /// Height of the placeholder inserted above the container (only when fixed)
    pub placeholder_height: Option<f64>,
}

/// True when the container must leave normal flow.
pub fn is_fixed(scroll_y: f64, trigger_offset: f64, natural_top: f64) -> bool {
    scroll_y + trigger_offset >= natural_top
}

/// Compute the layout for a scroll position
pub fn compute_layout(scroll_y: f64, trigger_offset: f64, geometry: StickyGeometry) -> StickyLayout {
    if is_fixed(scroll_y, trigger_offset, geometry.natural_top) {
        StickyLayout {
            fixed: true,
            placeholder_height: Some(geometry.height),
        }
    } else {
        StickyLayout::default()
    }
}

/// Sticky state signals
#[derive(Clone, Copy)]
pub struct StickySignals {
    pub fixed_read: ReadSignal<bool>,
    pub fixed_write: WriteSignal<bool>,
    pub height_read: ReadSignal<f64>,
    pub height_write: WriteSignal<f64>,
}

impl StickySignals {
    /// Placeholder height, present exactly while the container is fixed
    pub fn placeholder_height(&self) -> Option<f64> {
        self.fixed_read.get().then(|| self.height_read.get())
    }
}

pub fn create_sticky_signals() -> StickySignals {
    let (fixed_read, fixed_write) = signal(false);
    let (height_read, height_write) = signal(0.0f64);
    StickySignals {
        fixed_read,
        fixed_write,
        height_read,
        height_write,
    }
}

/// Listener handles held while the container is mounted
pub struct StickyBinding {
    scroll: Option<Closure<dyn FnMut(web_sys::Event)>>,
    observer: Option<web_sys::ResizeObserver>,
    _on_resize: Option<Closure<dyn FnMut(js_sys::Array)>>,
}

impl StickyBinding {
    /// Remove the scroll listener and disconnect the resize observer
    pub fn unbind(&mut self) {
        if let Some(scroll) = self.scroll.take() {
            if let Some(win) = web_sys::window() {
                let _ = win.remove_event_listener_with_callback("scroll", scroll.as_ref().unchecked_ref());
            }
        }
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self._on_resize = None;
    }
}

impl Drop for StickyBinding {
    fn drop(&mut self) {
        self.unbind();
    }
}

fn scroll_y() -> f64 {
    web_sys::window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

/// Measure natural offset and height of an element that is in normal flow
fn measure(el: &web_sys::HtmlElement) -> StickyGeometry {
    let rect = el.get_bounding_client_rect();
    StickyGeometry {
        natural_top: rect.top() + scroll_y(),
        height: el.offset_height() as f64,
    }
}

/// Bind window scroll listener and resize observer to `el`
pub fn bind_sticky(el: web_sys::HtmlElement, trigger_offset: f64, sticky: StickySignals) -> StickyBinding {
    let geometry = measure(&el);
    sticky.height_write.set(geometry.height);
    let natural_top = geometry.natural_top;

    let apply = move || {
        let layout = compute_layout(
            scroll_y(),
            trigger_offset,
            StickyGeometry {
                natural_top,
                height: sticky.height_read.get_untracked(),
            },
        );
        if sticky.fixed_read.get_untracked() != layout.fixed {
            sticky.fixed_write.set(layout.fixed);
        }
    };
    apply();

    let scroll = Closure::<dyn FnMut(web_sys::Event)>::new(move |_ev: web_sys::Event| apply());
    if let Some(win) = web_sys::window() {
        let _ = win.add_event_listener_with_callback("scroll", scroll.as_ref().unchecked_ref());
    }

    let observed = el.clone();
    let on_resize = Closure::<dyn FnMut(js_sys::Array)>::new(move |_entries: js_sys::Array| {
        let height = observed.offset_height() as f64;
        if height != sticky.height_read.get_untracked() {
            sticky.height_write.set(height);
        }
    });
    let observer = match web_sys::ResizeObserver::new(on_resize.as_ref().unchecked_ref()) {
        Ok(observer) => {
            observer.observe(&el);
            Some(observer)
        }
        Err(e) => {
            log::warn!("[STICKY] ResizeObserver unavailable: {:?}", e);
            None
        }
    };

    StickyBinding {
        scroll: Some(scroll),
        observer,
        _on_resize: Some(on_resize),
    }
}

/// Attach sticky behavior to a mounted div; listeners are removed on cleanup
pub fn use_sticky(node: NodeRef<leptos::html::Div>, trigger_offset: f64) -> StickySignals {
    let sticky = create_sticky_signals();
    let binding = StoredValue::new_local(None::<StickyBinding>);

    Effect::new(move |_| {
        if let Some(div) = node.get() {
            let el: web_sys::HtmlElement = div.into();
            let bound = bind_sticky(el, trigger_offset, sticky);
            binding.update_value(|b| *b = Some(bound));
        }
    });

    on_cleanup(move || {
        binding.try_update_value(|b| {
            if let Some(mut bound) = b.take() {
                bound.unbind();
            }
        });
    });

    sticky
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_exactly_at_threshold() {
        // T = 200, O = 50
        assert!(!is_fixed(149.0, 50.0, 200.0));
        assert!(is_fixed(150.0, 50.0, 200.0));
        assert!(is_fixed(900.0, 50.0, 200.0));
    }

    #[test]
    fn placeholder_present_only_when_fixed() {
        let geometry = StickyGeometry { natural_top: 120.0, height: 64.0 };

        let above = compute_layout(10.0, 0.0, geometry);
        assert!(!above.fixed);
        assert_eq!(above.placeholder_height, None);

        let below = compute_layout(130.0, 0.0, geometry);
        assert!(below.fixed);
        assert_eq!(below.placeholder_height, Some(64.0));
    }

    #[test]
    fn zero_offset_container_is_fixed_from_top() {
        let geometry = StickyGeometry { natural_top: 0.0, height: 40.0 };
        assert!(compute_layout(0.0, 0.0, geometry).fixed);
    }

    #[test]
    fn negative_trigger_offset_delays_fixing() {
        assert!(!is_fixed(200.0, -10.0, 200.0));
        assert!(is_fixed(210.0, -10.0, 200.0));
    }
}
