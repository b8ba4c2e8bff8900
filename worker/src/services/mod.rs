pub mod reconcile_loop;
