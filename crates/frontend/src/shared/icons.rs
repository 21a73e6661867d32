//! Иконки интерфейса (inline SVG, stroke-стиль).

use leptos::prelude::*;

macro_rules! svg_icon {
    ($($body:tt)*) => {
        view! {
            <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true">
                $($body)*
            </svg>
        }
        .into_any()
    };
}

pub fn icon(name: &str) -> AnyView {
    match name {
        "plus" => svg_icon! {
            <path d="M12 5v14"/>
            <path d="M5 12h14"/>
        },
        "refresh" => svg_icon! {
            <path d="M21 12a9 9 0 1 1-2.64-6.36"/>
            <path d="M21 3v6h-6"/>
        },
        "delete" => svg_icon! {
            <path d="M3 6h18"/>
            <path d="M8 6V4a2 2 0 0 1 2-2h4a2 2 0 0 1 2 2v2"/>
            <path d="M19 6l-1 14a2 2 0 0 1-2 2H8a2 2 0 0 1-2-2L5 6"/>
        },
        "save" => svg_icon! {
            <path d="M19 21H5a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h11l5 5v11a2 2 0 0 1-2 2z"/>
            <path d="M17 21v-8H7v8"/>
            <path d="M7 3v5h8"/>
        },
        "cancel" | "x" => svg_icon! {
            <path d="M18 6 6 18"/>
            <path d="M6 6l12 12"/>
        },
        "check" => svg_icon! {
            <path d="M20 6 9 17l-5-5"/>
        },
        "image" => svg_icon! {
            <rect x="3" y="3" width="18" height="18" rx="2"/>
            <circle cx="9" cy="9" r="2"/>
            <path d="M21 15l-5-5L5 21"/>
        },
        "map-pin" => svg_icon! {
            <path d="M20 10c0 6-8 12-8 12s-8-6-8-12a8 8 0 0 1 16 0z"/>
            <circle cx="12" cy="10" r="3"/>
        },
        "archive" => svg_icon! {
            <rect x="2" y="3" width="20" height="5" rx="1"/>
            <path d="M4 8v11a2 2 0 0 0 2 2h12a2 2 0 0 0 2-2V8"/>
            <path d="M10 12h4"/>
        },
        "calendar" => svg_icon! {
            <rect x="3" y="4" width="18" height="18" rx="2"/>
            <path d="M16 2v4"/>
            <path d="M8 2v4"/>
            <path d="M3 10h18"/>
        },
        "bar-chart" => svg_icon! {
            <path d="M12 20V10"/>
            <path d="M18 20V4"/>
            <path d="M6 20v-4"/>
        },
        "chevron-right" => svg_icon! {
            <path d="M9 18l6-6-6-6"/>
        },
        "user" => svg_icon! {
            <path d="M20 21v-2a4 4 0 0 0-4-4H8a4 4 0 0 0-4 4v2"/>
            <circle cx="12" cy="7" r="4"/>
        },
        "log-out" => svg_icon! {
            <path d="M9 21H5a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h4"/>
            <path d="M16 17l5-5-5-5"/>
            <path d="M21 12H9"/>
        },
        "panel-left-close" => svg_icon! {
            <rect x="3" y="3" width="18" height="18" rx="2"/>
            <path d="M9 3v18"/>
            <path d="M16 15l-3-3 3-3"/>
        },
        "panel-left-open" => svg_icon! {
            <rect x="3" y="3" width="18" height="18" rx="2"/>
            <path d="M9 3v18"/>
            <path d="M14 9l3 3-3 3"/>
        },
        "download" => svg_icon! {
            <path d="M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4"/>
            <path d="M7 10l5 5 5-5"/>
            <path d="M12 15V3"/>
        },
        "upload" => svg_icon! {
            <path d="M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4"/>
            <path d="M17 8l-5-5-5 5"/>
            <path d="M12 3v12"/>
        },
        "search" => svg_icon! {
            <circle cx="11" cy="11" r="8"/>
            <path d="M21 21l-4.35-4.35"/>
        },
        "link" => svg_icon! {
            <path d="M10 13a5 5 0 0 0 7.54.54l3-3a5 5 0 0 0-7.07-7.07l-1.72 1.71"/>
            <path d="M14 11a5 5 0 0 0-7.54-.54l-3 3a5 5 0 0 0 7.07 7.07l1.71-1.71"/>
        },
        _ => svg_icon! {
            <circle cx="12" cy="12" r="9"/>
        },
    }
}
