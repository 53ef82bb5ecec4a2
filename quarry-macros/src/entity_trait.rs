use crate::{decode_field::FieldType, decode_table::TableMetadata};
use proc_macro2::TokenStream;
use quote::quote;

fn quote_option(value: &Option<String>) -> TokenStream {
    match value {
        None => quote! { None },
        Some(v) => quote! { Some(#v) },
    }
}

pub(crate) fn entity_trait(table: &TableMetadata) -> TokenStream {
    let name = &table.item.ident;
    let name_str = name.to_string();
    let table_name = quote_option(&table.name);
    let fields = table.fields.iter().map(|f| {
        let ident = f.ident.to_string();
        let ident = ident.strip_prefix("r#").unwrap_or(&ident);
        let ty = &f.ty;
        let column_name = quote_option(&f.column_name);
        let kind = match &f.kind {
            FieldType::Scalar { nullable } => quote! {
                ::quarry::FieldKind::Scalar {
                    prototype: <#ty as ::quarry::AsValue>::as_empty_value,
                    nullable: #nullable,
                }
            },
            FieldType::Embedded => quote! {
                ::quarry::FieldKind::Embedded(<#ty as ::quarry::Entity>::shape)
            },
            FieldType::Unsupported(written) => quote! {
                ::quarry::FieldKind::Unsupported(#written)
            },
        };
        let primary_key = f.primary_key;
        let auto_increment = f.auto_increment;
        quote! {
            ::quarry::FieldShape {
                ident: #ident,
                column_name: #column_name,
                kind: #kind,
                primary_key: #primary_key,
                auto_increment: #auto_increment,
            }
        }
    });
    let unsupported = table.fields.iter().find_map(|f| match &f.kind {
        FieldType::Unsupported(written) => Some(format!(
            "field `{}` has the unsupported type `{written}`",
            f.ident
        )),
        _ => None,
    });
    let (slots, from_slots) = if let Some(reason) = unsupported {
        let body = quote! {
            Err(::quarry::QueryError::metadata(#name_str, #reason).into())
        };
        (quote!(_slots), body)
    } else {
        let takes = table.fields.iter().map(|f| {
            let ident = &f.ident;
            let ty = &f.ty;
            match f.kind {
                FieldType::Embedded => quote! {
                    let #ident = <#ty as ::quarry::Entity>::from_slots(slots)?;
                },
                _ => quote! {
                    let #ident = slots.take::<#ty>()?;
                },
            }
        });
        let idents = table.fields.iter().map(|f| &f.ident);
        let body = quote! {
            #(#takes)*
            Ok(Self { #(#idents),* })
        };
        (quote!(slots), body)
    };
    quote! {
        impl ::quarry::Entity for #name {
            fn shape() -> &'static ::quarry::EntityShape {
                static SHAPE: ::quarry::EntityShape = ::quarry::EntityShape {
                    name: #name_str,
                    table_name: #table_name,
                    id: ::std::any::TypeId::of::<#name>,
                    fields: &[#(#fields),*],
                };
                &SHAPE
            }
            fn from_slots(#slots: &mut ::quarry::Slots<'_>) -> ::quarry::Result<Self> {
                #from_slots
            }
        }
        impl ::quarry::FromRow for #name {
            fn result_kind() -> ::quarry::ResultKind {
                ::quarry::ResultKind::Composite(<Self as ::quarry::Entity>::shape())
            }
            fn from_row(
                plan: &::quarry::RowPlan,
                row: ::quarry::RowLabeled,
            ) -> ::quarry::Result<Self> {
                plan.assemble::<Self>(row)
            }
        }
    }
}
