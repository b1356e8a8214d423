use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use sweepview_core::{AttachedListeners, EventDisposition, InputHandlers, InputSource, Point};
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlCanvasElement, MouseEvent};

/// Routes `click` and `contextmenu` on a canvas to the controller.
pub(crate) struct CanvasHost {
    canvas: HtmlCanvasElement,
}

impl CanvasHost {
    pub(crate) fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas }
    }
}

struct CanvasListeners {
    click: EventListener,
    context_menu: EventListener,
}

impl AttachedListeners for CanvasListeners {
    fn detach(self: Box<Self>) {
        let Self {
            click,
            context_menu,
        } = *self;
        // both are removed from the canvas on drop
        drop(click);
        drop(context_menu);
        log::debug!("canvas listeners detached");
    }
}

fn pointer_positions(canvas: &HtmlCanvasElement, event: &MouseEvent) -> (Point, Point) {
    let rect = canvas.get_bounding_client_rect();
    (
        Point::new(event.client_x() as f64, event.client_y() as f64),
        Point::new(rect.left(), rect.top()),
    )
}

fn apply(disposition: EventDisposition, event: &MouseEvent) {
    if disposition == EventDisposition::PreventDefault {
        event.prevent_default();
        event.stop_propagation();
    }
}

impl InputSource for CanvasHost {
    fn attach(&self, handlers: InputHandlers) -> Box<dyn AttachedListeners> {
        // non-passive, otherwise the context menu can't be suppressed
        let options = EventListenerOptions {
            phase: EventListenerPhase::Bubble,
            passive: false,
        };

        let click = {
            let canvas = self.canvas.clone();
            let handlers = handlers.clone();
            EventListener::new_with_options(&self.canvas, "click", options, move |event: &Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let (client, origin) = pointer_positions(&canvas, event);
                apply(handlers.primary(client, origin), event);
            })
        };

        let context_menu = {
            let canvas = self.canvas.clone();
            EventListener::new_with_options(
                &self.canvas,
                "contextmenu",
                options,
                move |event: &Event| {
                    let Some(event) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    let (client, origin) = pointer_positions(&canvas, event);
                    apply(handlers.secondary(client, origin), event);
                },
            )
        };

        log::debug!("canvas listeners attached");
        Box::new(CanvasListeners {
            click,
            context_menu,
        })
    }
}
