/// Helper macro for locking items
///
/// ```rust, ignore
///  let _guard = lock!(slot.building);
/// ```
macro_rules! lock {
    ($lock:expr) => {
        $lock.lock().expect("Failed to acquire lock")
    };
}
