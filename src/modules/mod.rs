pub mod books;
pub mod filter;
pub mod search;

use books::repository::SharedBookRepository;
use shelf_kernel::ModuleRegistry;

/// Register all catalog modules with the registry, sharing one repository handle
pub fn register_all(registry: &mut ModuleRegistry, repository: SharedBookRepository) {
    registry.register_custom(books::create_module(repository.clone()));
    registry.register_custom(filter::create_module(repository.clone()));
    registry.register_custom(search::create_module(repository));
}
