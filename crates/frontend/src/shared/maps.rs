//! Виджет Google Maps.
//!
//! Скрипт SDK подключается тегом `<script>` с ключом из публичной конфигурации.
//! Карта и маркеры создаются через `js_sys::Reflect`, без отдельных биндингов.

use gloo_timers::future::TimeoutFuture;
use js_sys::{Array, Function, Reflect};
use leptos::html::Div;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::Serialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::shared::config::use_public_config;

const SCRIPT_ID: &str = "google-maps-sdk";
const LOAD_POLL_MS: u32 = 100;
const LOAD_POLL_ATTEMPTS: u32 = 100;

/// Центр по умолчанию (Москва)
pub const DEFAULT_CENTER: (f64, f64) = (55.7558, 37.6173);

#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub id: String,
    pub title: String,
    pub lat: f64,
    pub lng: f64,
}

fn js_err(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

fn get(target: &JsValue, key: &str) -> Result<JsValue, String> {
    Reflect::get(target, &JsValue::from_str(key)).map_err(js_err)
}

fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<(), String> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(js_err)
}

/// `window.google.maps`, если SDK уже загружен
fn maps_namespace() -> Option<JsValue> {
    let window = web_sys::window()?;
    let google = get(&window, "google").ok()?;
    if google.is_undefined() {
        return None;
    }
    let maps = get(&google, "maps").ok()?;
    let map_ctor = get(&maps, "Map").ok()?;
    if map_ctor.is_function() {
        Some(maps)
    } else {
        None
    }
}

fn construct(maps: &JsValue, class: &str, args: &[JsValue]) -> Result<JsValue, String> {
    let ctor: Function = get(maps, class)?.dyn_into().map_err(js_err)?;
    let args: Array = args.iter().collect();
    Reflect::construct(&ctor, &args)
        .map(JsValue::from)
        .map_err(js_err)
}

fn call_method(target: &JsValue, method: &str, args: &[JsValue]) -> Result<JsValue, String> {
    let func: Function = get(target, method)?.dyn_into().map_err(js_err)?;
    let args: Array = args.iter().collect();
    Reflect::apply(&func, target, &args).map_err(js_err)
}

#[derive(Serialize)]
struct LatLngLiteral {
    lat: f64,
    lng: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapOptions {
    center: LatLngLiteral,
    zoom: u32,
    street_view_control: bool,
    map_type_control: bool,
}

#[derive(Serialize)]
struct MarkerOptions<'a> {
    position: LatLngLiteral,
    title: &'a str,
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, String> {
    serde_wasm_bindgen::to_value(value).map_err(|e| e.to_string())
}

fn lat_lng_literal(lat: f64, lng: f64) -> Result<JsValue, String> {
    to_js(&LatLngLiteral { lat, lng })
}

/// Подключает SDK (однократно) и ждёт появления `google.maps.Map`
pub async fn load_google_maps(api_key: &str) -> Result<JsValue, String> {
    if let Some(maps) = maps_namespace() {
        return Ok(maps);
    }
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("No document object")?;

    if document.get_element_by_id(SCRIPT_ID).is_none() {
        let script: web_sys::HtmlScriptElement = document
            .create_element("script")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| "Failed to cast to script".to_string())?;
        script.set_id(SCRIPT_ID);
        script.set_src(&format!(
            "https://maps.googleapis.com/maps/api/js?key={}",
            urlencoding::encode(api_key)
        ));
        script.set_async(true);
        let head = document.head().ok_or("No head element")?;
        head.append_child(&script).map_err(js_err)?;
    }

    for _ in 0..LOAD_POLL_ATTEMPTS {
        if let Some(maps) = maps_namespace() {
            return Ok(maps);
        }
        TimeoutFuture::new(LOAD_POLL_MS).await;
    }
    Err("Google Maps не загрузились".to_string())
}

/// Созданная карта с маркерами и подписками.
/// Замыкания живут, пока жив handle.
struct MapHandle {
    maps: JsValue,
    map: JsValue,
    markers: Vec<JsValue>,
    _click: Option<Closure<dyn FnMut(JsValue)>>,
    marker_clicks: Vec<Closure<dyn FnMut(JsValue)>>,
}

impl MapHandle {
    fn create(
        maps: JsValue,
        container: &web_sys::HtmlElement,
        center: (f64, f64),
        zoom: u32,
    ) -> Result<Self, String> {
        let options = to_js(&MapOptions {
            center: LatLngLiteral {
                lat: center.0,
                lng: center.1,
            },
            zoom,
            street_view_control: false,
            map_type_control: false,
        })?;
        let map = construct(&maps, "Map", &[container.clone().into(), options])?;
        Ok(Self {
            maps,
            map,
            markers: Vec::new(),
            _click: None,
            marker_clicks: Vec::new(),
        })
    }

    /// Клик по карте отдаёт координаты точки
    fn on_click(&mut self, callback: Callback<(f64, f64)>) -> Result<(), String> {
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            let coords = get(&event, "latLng").and_then(|lat_lng| {
                let lat = call_method(&lat_lng, "lat", &[])?;
                let lng = call_method(&lat_lng, "lng", &[])?;
                Ok((lat.as_f64(), lng.as_f64()))
            });
            match coords {
                Ok((Some(lat), Some(lng))) => callback.run((lat, lng)),
                Ok(_) => {}
                Err(e) => log::warn!("Map click without coordinates: {}", e),
            }
        });
        call_method(
            &self.map,
            "addListener",
            &[JsValue::from_str("click"), closure.as_ref().clone()],
        )?;
        self._click = Some(closure);
        Ok(())
    }

    fn clear_markers(&mut self) {
        for marker in self.markers.drain(..) {
            if let Err(e) = call_method(&marker, "setMap", &[JsValue::NULL]) {
                log::warn!("Marker not removed: {}", e);
            }
        }
        self.marker_clicks.clear();
    }

    fn set_markers(
        &mut self,
        points: &[MapPoint],
        on_marker_click: Option<Callback<String>>,
    ) -> Result<(), String> {
        self.clear_markers();
        for point in points {
            let options = to_js(&MarkerOptions {
                position: LatLngLiteral {
                    lat: point.lat,
                    lng: point.lng,
                },
                title: &point.title,
            })?;
            set(&options, "map", &self.map)?;
            let marker = construct(&self.maps, "Marker", &[options])?;

            if let Some(callback) = on_marker_click {
                let id = point.id.clone();
                let closure = Closure::<dyn FnMut(JsValue)>::new(move |_: JsValue| {
                    callback.run(id.clone());
                });
                call_method(
                    &marker,
                    "addListener",
                    &[JsValue::from_str("click"), closure.as_ref().clone()],
                )?;
                self.marker_clicks.push(closure);
            }
            self.markers.push(marker);
        }
        Ok(())
    }

    fn pan_to(&self, lat: f64, lng: f64) -> Result<(), String> {
        call_method(&self.map, "panTo", &[lat_lng_literal(lat, lng)?]).map(|_| ())
    }
}

/// Карта с маркерами точек.
///
/// `on_pick` включает выбор координат кликом, `on_marker_click` получает id точки.
/// Без ключа в конфигурации показывается заглушка.
#[component]
pub fn MapView(
    #[prop(into)] points: Signal<Vec<MapPoint>>,
    #[prop(optional)] center: Option<Signal<Option<(f64, f64)>>>,
    #[prop(optional)] on_pick: Option<Callback<(f64, f64)>>,
    #[prop(optional)] on_marker_click: Option<Callback<String>>,
    #[prop(default = 11)] zoom: u32,
) -> impl IntoView {
    let config = use_public_config();
    let container = NodeRef::<Div>::new();
    let handle = StoredValue::new_local(None::<MapHandle>);
    let (ready, set_ready) = signal(false);
    let (error, set_error) = signal(None::<String>);

    let api_key = Signal::derive(move || config.with(|c| c.maps_api_key.clone()).unwrap_or_default());

    // Создание карты после появления контейнера и ключа
    Effect::new(move |_| {
        let key = api_key.get();
        let Some(el) = container.get() else { return };
        if key.is_empty() || ready.get_untracked() {
            return;
        }
        let el: web_sys::HtmlElement = el.into();
        let initial = center
            .and_then(|c| c.get_untracked())
            .unwrap_or(DEFAULT_CENTER);
        spawn_local(async move {
            let created = load_google_maps(&key)
                .await
                .and_then(|maps| MapHandle::create(maps, &el, initial, zoom))
                .and_then(|mut map| {
                    if let Some(cb) = on_pick {
                        map.on_click(cb)?;
                    }
                    Ok(map)
                });
            match created {
                Ok(map) => {
                    handle.set_value(Some(map));
                    set_ready.set(true);
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    });

    Effect::new(move |_| {
        let current = points.get();
        if !ready.get() {
            return;
        }
        handle.update_value(|h| {
            if let Some(map) = h.as_mut() {
                if let Err(e) = map.set_markers(&current, on_marker_click) {
                    log::warn!("Markers not rendered: {}", e);
                }
            }
        });
    });

    Effect::new(move |_| {
        let Some((lat, lng)) = center.and_then(|c| c.get()) else { return };
        if !ready.get() {
            return;
        }
        handle.with_value(|h| {
            if let Some(map) = h.as_ref() {
                if let Err(e) = map.pan_to(lat, lng) {
                    log::warn!("Map not centered: {}", e);
                }
            }
        });
    });

    view! {
        <div class="map-view">
            <Show
                when=move || !api_key.get().is_empty()
                fallback=|| view! {
                    <div class="map-view__placeholder">"Карта недоступна: не задан ключ Google Maps"</div>
                }
            >
                <div class="map-view__canvas" node_ref=container></div>
            </Show>
            {move || error.get().map(|e| view! { <div class="map-view__error">{e}</div> })}
        </div>
    }
}
