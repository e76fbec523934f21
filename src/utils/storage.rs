// ============================================================================
// STORAGE - Helpers de localStorage
// ============================================================================
// En el host (tests) no hay localStorage: las funciones se stubean y el
// caché simplemente no existe.
// ============================================================================

use serde::{de::DeserializeOwned, Serialize};

#[cfg(target_arch = "wasm32")]
pub fn get_local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(target_arch = "wasm32")]
pub fn save_to_storage<T: Serialize>(key: &str, value: &T) -> Result<(), String> {
    let storage = get_local_storage().ok_or("No se pudo acceder a localStorage")?;
    let json = serde_json::to_string(value)
        .map_err(|e| format!("Error serializando datos: {}", e))?;
    storage.set_item(key, &json)
        .map_err(|_| "Error guardando en localStorage".to_string())?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
pub fn load_from_storage<T: DeserializeOwned>(key: &str) -> Option<T> {
    let storage = get_local_storage()?;
    let json = storage.get_item(key).ok()??;
    serde_json::from_str(&json).ok()
}

#[cfg(target_arch = "wasm32")]
pub fn remove_from_storage(key: &str) -> Result<(), String> {
    let storage = get_local_storage().ok_or("No se pudo acceder a localStorage")?;
    storage.remove_item(key)
        .map_err(|_| "Error eliminando de localStorage".to_string())?;
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_to_storage<T: Serialize>(_key: &str, _value: &T) -> Result<(), String> {
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_from_storage<T: DeserializeOwned>(_key: &str) -> Option<T> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn remove_from_storage(_key: &str) -> Result<(), String> {
    Ok(())
}
